use std::time::Instant;
use surf::middleware::{Middleware, Next};
use surf::{Client, Request, Response, Result};

/// Logs every outgoing request together with its status and latency
#[derive(Debug, Default, Clone, Copy)]
pub struct SurfLogging;

#[surf::utils::async_trait]
impl Middleware for SurfLogging {
    async fn handle(&self, req: Request, client: Client, next: Next<'_>) -> Result<Response> {
        let method = req.method();
        let url = req.url().clone();
        let started = Instant::now();
        log::debug!("--> {} {}", method, url);

        match next.run(req, client).await {
            Ok(response) => {
                log::debug!(
                    "<-- {} {} {} ({:?})",
                    method,
                    url,
                    response.status(),
                    started.elapsed()
                );
                Ok(response)
            }
            Err(err) => {
                log::warn!("<-- {} {} failed: {} ({:?})", method, url, err, started.elapsed());
                Err(err)
            }
        }
    }
}
