//! HTTP middleware for the Spoonacular client.

use crate::spoonacular::errors::without_url;
use crate::utils::fmt_duration;
use http::Extensions;
use reqwest::{Request, Response};
use reqwest_middleware::{Middleware, Next};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Upstream calls slower than this are logged at warn level.
const SLOW_REQUEST: Duration = Duration::from_secs(2);

/// Logs every outbound request. Only the path is recorded: the query string
/// carries the API key, which is also stripped from returned errors.
pub struct TransparentMiddleware;

#[async_trait::async_trait]
impl Middleware for TransparentMiddleware {
    async fn handle(
        &self,
        req: Request,
        extensions: &mut Extensions,
        next: Next<'_>,
    ) -> reqwest_middleware::Result<Response> {
        let method = req.method().clone();
        let path = req.url().path().to_owned();
        trace!(method = %method, path = %path, "spoonacular request");

        let start = Instant::now();
        let result = next.run(req, extensions).await.map_err(without_url);
        let elapsed = start.elapsed();

        match &result {
            Ok(response) => {
                let status = response.status().as_u16();
                if elapsed > SLOW_REQUEST {
                    warn!(method = %method, path = %path, status, duration = fmt_duration(elapsed), "slow spoonacular response");
                } else {
                    debug!(method = %method, path = %path, status, duration = fmt_duration(elapsed), "spoonacular response");
                }
            }
            Err(e) => {
                warn!(method = %method, path = %path, error = %e, duration = fmt_duration(elapsed), "spoonacular request failed");
            }
        }

        result
    }
}
