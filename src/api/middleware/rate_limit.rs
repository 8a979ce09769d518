use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use deadpool_redis::redis::AsyncCommands;
use tracing::warn;

use crate::api::middleware::auth::lang_of;
use crate::api::response::{ApiError, ErrorCode};
use crate::api::state::AppState;
use crate::infrastructure::Claims;

/// Fixed-window limiter keyed by user (or `anonymous`) + method + path,
/// counted in Redis. Redis being unreachable does not block the request.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let subject = request
        .extensions()
        .get::<Claims>()
        .map(|claims| claims.sub.to_string())
        .unwrap_or_else(|| "anonymous".to_string());
    let key = format!(
        "rate:{subject}:{}:{}",
        request.method(),
        request.uri().path()
    );

    let limit = &state.config.rate_limit;
    match count_request(&state, &key, limit.window_seconds).await {
        Ok(count) if count > limit.max_requests => {
            let lang = lang_of(&request);
            warn!(%key, count, "rate limit exceeded");
            return Err(ApiError::localized(
                StatusCode::TOO_MANY_REQUESTS,
                ErrorCode::RateLimited,
                &state.catalog,
                &lang,
            ));
        }
        Ok(_) => {}
        Err(e) => {
            warn!(error = %e, "rate limiter unavailable, letting request through");
        }
    }

    Ok(next.run(request).await)
}

async fn count_request(
    state: &AppState,
    key: &str,
    window_seconds: u64,
) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = state.redis_pool.get().await?;
    let count: u64 = conn.incr(key, 1u64).await?;
    if count == 1 {
        conn.expire::<_, ()>(key, window_seconds as i64).await?;
    }
    Ok(count)
}
