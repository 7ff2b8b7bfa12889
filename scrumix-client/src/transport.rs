use crate::error::Error;
use async_trait::async_trait;
use getset::Getters;
use serde_json::Value;
use std::sync::Arc;
use surf::Client;
use url::Url;
use utils::surf_logging::SurfLogging;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for surf::http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => surf::http::Method::Get,
            Method::Post => surf::http::Method::Post,
            Method::Put => surf::http::Method::Put,
            Method::Delete => surf::http::Method::Delete,
        }
    }
}

/// A fully resolved request, ready to hand to a [`Transport`]
#[derive(Debug, Clone, Getters)]
#[get = "pub"]
pub struct ApiRequest {
    method: Method,
    url: Url,
    cookie: Option<String>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            cookie: None,
            body: None,
        }
    }

    pub fn with_cookie(mut self, cookie: Option<String>) -> Self {
        self.cookie = cookie;
        self
    }

    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    /// Path plus query, as the backend sees it
    pub fn target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }
}

/// Status and body of an HTTP response, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs the actual network call.
///
/// Implementations only report failures to produce a response at all;
/// status codes are interpreted by [`crate::envelope::normalize`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, Error>;
}

pub type SharedTransport = Arc<dyn Transport>;

/// Production transport backed by surf
#[derive(Clone)]
pub struct SurfTransport {
    http: Client,
}

impl Default for SurfTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new().with(SurfLogging),
        }
    }
}

#[async_trait]
impl Transport for SurfTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, Error> {
        let mut builder = surf::RequestBuilder::new(request.method.into(), request.url)
            .header("Accept", "application/json");
        if let Some(cookie) = &request.cookie {
            builder = builder.header("Cookie", cookie.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body_json(body)?;
        }

        let mut response = self.http.send(builder).await?;
        let status = u16::from(response.status());
        let body = response.body_bytes().await?;
        Ok(RawResponse::new(status, body))
    }
}
