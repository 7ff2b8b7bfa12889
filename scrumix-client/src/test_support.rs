use crate::error::Error;
use crate::transport::{ApiRequest, Method, RawResponse, Transport};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const BASE_PATH: &str = "/api/v1";

#[derive(Clone)]
enum Reply {
    Status(u16, String),
    Fail(String),
}

/// Scripted transport. Unscripted routes answer 404 `{"detail":"Not found"}`.
///
/// A gated transport holds every request until [`MockTransport::open`] is
/// called, which lets a test pile up concurrent callers.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<(Method, String), Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
    gate: Option<Semaphore>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gated() -> Arc<Self> {
        Arc::new(Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        })
    }

    pub fn open(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1024);
        }
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: &str) {
        self.replies.lock().unwrap().insert(
            (method, format!("{}{}", BASE_PATH, path)),
            Reply::Status(status, body.to_string()),
        );
    }

    pub fn fail(&self, method: Method, path: &str, message: &str) {
        self.replies.lock().unwrap().insert(
            (method, format!("{}{}", BASE_PATH, path)),
            Reply::Fail(message.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests seen for `method` on `path`, ignoring the query string
    pub fn count(&self, method: Method, path: &str) -> usize {
        let full = format!("{}{}", BASE_PATH, path);
        self.requests()
            .iter()
            .filter(|request| *request.method() == method && request.url().path() == full)
            .count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, Error> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await.unwrap();
        }

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&(*request.method(), request.url().path().to_string()))
            .cloned();
        match reply {
            Some(Reply::Status(status, body)) => Ok(RawResponse::new(status, body.into_bytes())),
            Some(Reply::Fail(message)) => Err(Error::transport(message)),
            None => Ok(RawResponse::new(404, br#"{"detail":"Not found"}"#.to_vec())),
        }
    }
}
