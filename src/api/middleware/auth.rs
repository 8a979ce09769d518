use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::api::response::ApiError;
use crate::api::state::AppState;
use crate::infrastructure::auth::jwt;
use crate::infrastructure::i18n;

/// Validates the Bearer access token and stashes its claims in the request
/// extensions for handlers to pick up.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let lang = lang_of(&request);

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized(&state.catalog, &lang))?;

    let claims = jwt::verify_token(token, &state.config.auth.jwt_secret).map_err(|e| {
        debug!(error = %e, "token rejected");
        ApiError::unauthorized(&state.catalog, &lang)
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

pub(crate) fn lang_of(request: &Request) -> String {
    let header = request
        .headers()
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    i18n::negotiate(header)
}
