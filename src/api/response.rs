use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::convert::Infallible;

use crate::domain::DomainError;
use crate::infrastructure::{i18n, Catalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    InvalidCredentials,
    UsernameAlreadyExists,
    UserNotFound,
    InterviewNotFound,
    InterviewAlreadyStarted,
    InsufficientCredits,
    OrderNotFound,
    PaymentFailed,
    Unauthorized,
    Forbidden,
    RateLimited,
    InternalServerError,
}

impl ErrorCode {
    /// Catalog key for the code's default message.
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidCredentials => "invalid_credentials",
            Self::UsernameAlreadyExists => "username_already_exists",
            Self::UserNotFound => "user_not_found",
            Self::InterviewNotFound => "interview_not_found",
            Self::InterviewAlreadyStarted => "interview_already_started",
            Self::InsufficientCredits => "insufficient_credits",
            Self::OrderNotFound => "order_not_found",
            Self::PaymentFailed => "payment_failed",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::RateLimited => "rate_limited",
            Self::InternalServerError => "internal_server_error",
        }
    }
}

/// Uniform body for every JSON response.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
}

pub struct ApiSuccess<T: Serialize>(StatusCode, T);

pub fn ok<T: Serialize>(data: T) -> ApiSuccess<T> {
    ApiSuccess(StatusCode::OK, data)
}

pub fn created<T: Serialize>(data: T) -> ApiSuccess<T> {
    ApiSuccess(StatusCode::CREATED, data)
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        let body = ApiEnvelope {
            success: true,
            data: Some(self.1),
            error: None,
            code: None,
        };
        (self.0, Json(body)).into_response()
    }
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// An error whose message is the code's catalog entry in `lang`.
    pub fn localized(status: StatusCode, code: ErrorCode, catalog: &Catalog, lang: &str) -> Self {
        Self::new(status, code, catalog.translate(lang, code.message_key()))
    }

    pub fn invalid_input(catalog: &Catalog, lang: &str) -> Self {
        Self::localized(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, catalog, lang)
    }

    pub fn unauthorized(catalog: &Catalog, lang: &str) -> Self {
        Self::localized(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            catalog,
            lang,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiEnvelope::<()> {
            success: false,
            data: None,
            error: Some(self.message),
            code: Some(self.code),
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiSuccess<T>, ApiError>;

/// Maps a domain error to status + code, localizing the message. Unexpected
/// errors are logged here and surfaced as a generic 500.
pub fn map_domain(err: DomainError, catalog: &Catalog, lang: &str) -> ApiError {
    use DomainError::*;

    let (status, code) = match &err {
        UserNotFound => (StatusCode::NOT_FOUND, ErrorCode::UserNotFound),
        UsernameTaken => (StatusCode::CONFLICT, ErrorCode::UsernameAlreadyExists),
        InvalidCredentials => (StatusCode::UNAUTHORIZED, ErrorCode::InvalidCredentials),
        InvalidVerificationCode => (StatusCode::BAD_REQUEST, ErrorCode::InvalidInput),
        InterviewNotFound => (StatusCode::BAD_REQUEST, ErrorCode::InterviewNotFound),
        InterviewAlreadyStarted => (StatusCode::BAD_REQUEST, ErrorCode::InterviewAlreadyStarted),
        InsufficientCredits => (StatusCode::FORBIDDEN, ErrorCode::InsufficientCredits),
        OrderNotFound => (StatusCode::NOT_FOUND, ErrorCode::OrderNotFound),
        PaymentIncomplete => (StatusCode::BAD_REQUEST, ErrorCode::PaymentFailed),
        Forbidden => (StatusCode::FORBIDDEN, ErrorCode::Forbidden),
        Validation(message) => {
            return ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, message);
        }
        Internal(_) | ExternalService(_) | Timeout(_) => {
            tracing::error!(error = %err, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
            )
        }
    };

    ApiError::localized(status, code, catalog, lang)
}

/// Request language negotiated from `Accept-Language`.
#[derive(Debug, Clone)]
pub struct Lang(pub String);

impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|v| v.to_str().ok());
        Ok(Lang(i18n::negotiate(header)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_shape() {
        let body = ApiEnvelope {
            success: true,
            data: Some(serde_json::json!({"n": 1})),
            error: None,
            code: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": {"n": 1}}));
    }

    #[test]
    fn test_error_envelope_shape() {
        let body = ApiEnvelope::<()> {
            success: false,
            data: None,
            error: Some("Username already exists".into()),
            code: Some(ErrorCode::UsernameAlreadyExists),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": "Username already exists",
                "code": "USERNAME_ALREADY_EXISTS"
            })
        );
    }

    #[test]
    fn test_map_domain_localizes() {
        let catalog = Catalog::load().unwrap();
        let err = map_domain(DomainError::InsufficientCredits, &catalog, "zh");
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.code, ErrorCode::InsufficientCredits);
        assert_eq!(err.message, "积分不足");
    }

    #[test]
    fn test_map_domain_passes_validation_message_through() {
        let catalog = Catalog::load().unwrap();
        let err = map_domain(
            DomainError::validation("No such price"),
            &catalog,
            "en",
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "No such price");
    }
}
