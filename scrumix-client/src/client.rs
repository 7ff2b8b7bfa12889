use crate::api::{BacklogsApi, DocumentationApi, NotificationsApi, SprintsApi, UsersApi};
use crate::config::ClientConfig;
use crate::deduplication::{DeduplicationStats, RequestDeduplicator};
use crate::envelope::{normalize, ApiResponse};
use crate::error::Error;
use crate::invalidation::{InvalidationPolicy, Mutation};
use crate::key::{Operation, RequestKey};
use crate::models::Validate;
use crate::transport::{ApiRequest, Method, SharedTransport, SurfTransport};
use futures::Future;
use getset::Getters;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use utils::{join_url, QueryParams};

/// Who the client is acting for. The cookie is forwarded verbatim.
#[derive(Debug, Clone, Default, Getters)]
#[get = "pub"]
pub struct Session {
    cookie: Option<String>,
    /// Project used when a call does not name one
    project_id: Option<i64>,
}

impl Session {
    pub fn new(cookie: impl Into<String>) -> Self {
        Self {
            cookie: Some(cookie.into()),
            project_id: None,
        }
    }

    pub fn with_project(mut self, project_id: i64) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

type Envelope = ApiResponse<Value>;

/// Client for the Scrumix REST API.
///
/// Reads are coalesced: concurrent identical reads share one request.
/// Writes go through [`ApiClient::mutate`], which drops the in-flight reads
/// the [`InvalidationPolicy`] says they affect. Clones share the transport
/// and the in-flight map.
#[derive(Clone)]
pub struct ApiClient {
    transport: SharedTransport,
    config: Arc<ClientConfig>,
    session: Session,
    deduplicator: RequestDeduplicator<Envelope>,
    invalidation: Arc<InvalidationPolicy>,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl ApiClient {
    /// Create a client using the surf transport
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(SurfTransport::new()))
    }

    pub fn with_transport(config: ClientConfig, transport: SharedTransport) -> Self {
        log::info!("Initialized API client for {}", config.base_url());
        Self {
            transport,
            deduplicator: RequestDeduplicator::new(config.deduplication().clone()),
            config: Arc::new(config),
            session: Session::default(),
            invalidation: Arc::new(InvalidationPolicy::default()),
        }
    }

    pub fn with_invalidation_policy(mut self, policy: InvalidationPolicy) -> Self {
        self.invalidation = Arc::new(policy);
        self
    }

    /// A client acting for `session`. It gets its own in-flight map, so
    /// reads are never shared across sessions.
    pub fn for_session(&self, session: Session) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: Arc::clone(&self.config),
            session,
            deduplicator: RequestDeduplicator::new(self.config.deduplication().clone()),
            invalidation: Arc::clone(&self.invalidation),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notifications(&self) -> NotificationsApi<'_> {
        NotificationsApi::new(self)
    }

    pub fn backlogs(&self) -> BacklogsApi<'_> {
        BacklogsApi::new(self)
    }

    pub fn sprints(&self) -> SprintsApi<'_> {
        SprintsApi::new(self)
    }

    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    pub fn documentation(&self) -> DocumentationApi<'_> {
        DocumentationApi::new(self)
    }

    /// Perform one call and normalize its outcome. No coalescing.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Envelope {
        let url = match join_url(self.config.base_url(), path, query) {
            Ok(url) => url,
            Err(err) => return ApiResponse::failure(err.into()),
        };
        let request = ApiRequest::new(method, url)
            .with_cookie(self.session.cookie().clone())
            .with_body(body);
        let target = request.target();

        let response = normalize(self.transport.send(request).await);
        match &response.error {
            Some(err) if err.is_authentication() => {
                log::debug!("{} {} rejected: {}", method, target, err)
            }
            Some(err) => log::debug!("{} {} returned error: {}", method, target, err),
            None => {}
        }
        response
    }

    /// Coalesced GET
    pub async fn read<T: DeserializeOwned>(
        &self,
        operation: Operation,
        path: &str,
        query: QueryParams,
    ) -> ApiResponse<T> {
        self.coalesced(operation, Method::Get, path, query, None)
            .await
            .decode()
    }

    /// Coalesced read that carries its parameters in a POST body, such as a search
    pub async fn query<T, B>(&self, operation: Operation, path: &str, body: &B) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + Validate,
    {
        let body = match validated(body) {
            Ok(body) => body,
            Err(err) => return ApiResponse::failure(err),
        };
        self.coalesced(operation, Method::Post, path, QueryParams::new(), Some(body))
            .await
            .decode()
    }

    async fn coalesced(
        &self,
        operation: Operation,
        method: Method,
        path: &str,
        query: QueryParams,
        body: Option<Value>,
    ) -> Envelope {
        let key = RequestKey::from_request(operation, method, path, &query, body.as_ref());
        let client = self.clone();
        let path = path.to_string();

        self.deduplicator
            .execute(key, move || async move {
                client.send(method, &path, &query, body).await
            })
            .await
    }

    /// Issue a write. The reads it affects are invalidated right before it is
    /// sent, so no later read joins a pre-mutation request, and again once it
    /// settles, dropping reads that started while it was in flight.
    pub async fn mutate<T: DeserializeOwned>(
        &self,
        mutation: Mutation,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<T> {
        self.invalidation.apply(mutation, &self.deduplicator);
        let response = self.send(method, path, &QueryParams::new(), body).await;
        self.invalidation.apply(mutation, &self.deduplicator);
        response.decode()
    }

    /// [`ApiClient::mutate`] with a payload validated client-side first
    pub async fn mutate_with<T, B>(
        &self,
        mutation: Mutation,
        method: Method,
        path: &str,
        payload: &B,
    ) -> ApiResponse<T>
    where
        T: DeserializeOwned,
        B: Serialize + Validate,
    {
        match validated(payload) {
            Ok(body) => self.mutate(mutation, method, path, Some(body)).await,
            Err(err) => ApiResponse::failure(err),
        }
    }

    /// Forget every in-flight read, as when the session ends
    pub fn reset(&self) {
        self.deduplicator.clear();
    }

    pub fn deduplication_stats(&self) -> DeduplicationStats {
        self.deduplicator.stats()
    }

    #[cfg(test)]
    pub(crate) fn deduplicator(&self) -> &RequestDeduplicator<Envelope> {
        &self.deduplicator
    }
}

fn validated<B: Serialize + Validate>(payload: &B) -> Result<Value, Error> {
    payload.validate()?;
    Ok(serde_json::to_value(payload)?)
}

/// Give up on `request` after `deadline`, reporting "Request timed out".
///
/// Dropping the request only cancels the underlying call if no other caller
/// joined it.
pub async fn with_deadline<T, F>(deadline: Duration, request: F) -> ApiResponse<T>
where
    F: Future<Output = ApiResponse<T>>,
{
    match tokio::time::timeout(deadline, request).await {
        Ok(response) => response,
        Err(_) => {
            log::warn!("Request exceeded its {:?} deadline", deadline);
            ApiResponse::failure(Error::timeout())
        }
    }
}
