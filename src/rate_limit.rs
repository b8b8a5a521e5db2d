use std::{sync::Arc, time::Duration};

use axum::{
    extract::Request,
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        StatusCode,
    },
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

use crate::error::ApiError;

/// How often fully replenished clients are dropped from the limiter
const PRUNE_EVERY: Duration = Duration::from_secs(60);

/// Time to regain one request so that `max` requests refill over `window`
#[must_use]
pub fn replenish_period(max: u32, window: Duration) -> Duration {
    (window / max.max(1)).max(Duration::from_nanos(1))
}

/// Rewrite the limiter's plain text `429` into the JSON error body, keeping its headers
pub async fn json_rejection(req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    if res.status() != StatusCode::TOO_MANY_REQUESTS {
        return res;
    }

    let (parts, _) = res.into_parts();
    tracing::warn!(headers = ?parts.headers, "rate limit exceeded");

    let mut json = ApiError::RateLimited.into_response();
    for (name, value) in &parts.headers {
        if *name != CONTENT_TYPE && *name != CONTENT_LENGTH {
            let _ = json.headers_mut().insert(name.clone(), value.clone());
        }
    }
    json
}

/// Limit every client ip to `max` requests per `window`, refilled continuously.
///
/// Responses carry `x-ratelimit-*` headers. A background thread drops
/// clients whose budget is back to full.
pub fn layer<S>(router: Router<S>, max: u32, window: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let Some(config) = GovernorConfigBuilder::default()
        .period(replenish_period(max, window))
        .burst_size(max)
        .use_headers()
        .finish()
    else {
        tracing::warn!(max, ?window, "rate limiting disabled, invalid quota");
        return router;
    };
    let config = Arc::new(config);

    let limiter = Arc::clone(config.limiter());
    let _ = std::thread::spawn(move || loop {
        std::thread::sleep(PRUNE_EVERY);
        limiter.retain_recent();
        tracing::debug!(clients = limiter.len(), "rate limiter pruned");
    });

    router.layer(GovernorLayer { config }).layer(middleware::from_fn(json_rejection))
}
