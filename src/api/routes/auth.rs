use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::api::response::{created, map_domain, ok, ApiError, ApiResult, ErrorCode, Lang};
use crate::api::state::AppState;
use crate::infrastructure::auth::jwt;

pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn register(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<MessageResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::invalid_input(&state.catalog, &lang));
    }

    let user = state
        .users
        .register(&request.username, &request.password)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    // Mail is fire-and-forget; a failed send only gets logged.
    let mailer = state.mailer.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer
            .send_verification(&user.username, &user.verification_code)
            .await
        {
            warn!(username = %user.username, error = %e, "verification email failed");
        }
    });

    Ok(created(MessageResponse {
        message: state.catalog.translate(&lang, "registration_success"),
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Json(request): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::invalid_input(&state.catalog, &lang));
    }

    let user = state
        .users
        .authenticate(&request.username, &request.password)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    let auth = &state.config.auth;
    let access_token = jwt::mint_token(&user, &auth.jwt_secret, auth.access_ttl_seconds)
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;
    let refresh_token = jwt::mint_token(&user, &auth.refresh_secret, auth.refresh_ttl_seconds)
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(LoginResponse {
        user_id: user.id,
        access_token,
        refresh_token,
    }))
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn refresh(
    State(state): State<AppState>,
    Lang(lang): Lang,
    headers: HeaderMap,
) -> ApiResult<TokenPairResponse> {
    let token = headers
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InvalidInput,
                state.catalog.translate(&lang, "missing_refresh_token"),
            )
        })?;

    let auth = &state.config.auth;
    let claims = jwt::verify_token(token, &auth.refresh_secret).map_err(|_| {
        ApiError::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            state.catalog.translate(&lang, "invalid_refresh_token"),
        )
    })?;

    let access_token = jwt::mint_from_claims(&claims, &auth.jwt_secret, auth.access_ttl_seconds)
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;
    let refresh_token =
        jwt::mint_from_claims(&claims, &auth.refresh_secret, auth.refresh_ttl_seconds)
            .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(TokenPairResponse {
        access_token,
        refresh_token,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyEmailQuery {
    pub code: Option<String>,
    pub email: Option<String>,
}

pub async fn verify_email(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Query(query): Query<VerifyEmailQuery>,
) -> ApiResult<MessageResponse> {
    let (code, email) = match (query.code, query.email) {
        (Some(code), Some(email)) if !code.is_empty() && !email.is_empty() => (code, email),
        _ => return Err(ApiError::invalid_input(&state.catalog, &lang)),
    };

    state
        .users
        .verify_email(&email, &code)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(MessageResponse {
        message: state.catalog.translate(&lang, "email_verified"),
    }))
}
