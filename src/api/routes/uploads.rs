use axum::{
    extract::{Extension, Multipart, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::debug;

use crate::api::response::{map_domain, ok, ApiError, ApiResult, ErrorCode, Lang};
use crate::api::state::AppState;
use crate::infrastructure::extract::{self, MAX_UPLOAD_BYTES, SUPPORTED_MIME_TYPES};
use crate::infrastructure::Claims;

#[derive(Debug, Serialize)]
pub struct UploadResumeResponse {
    pub file_content: String,
}

/// Accepts a multipart `file` field and returns its extracted plain text.
pub async fn upload_resume(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(_claims): Extension<Claims>,
    mut multipart: Multipart,
) -> ApiResult<UploadResumeResponse> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, e.to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let mime_type = field.content_type().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(|e| {
            ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, e.to_string())
        })?;
        file = Some((mime_type, data.to_vec()));
        break;
    }

    let (mime_type, data) =
        file.ok_or_else(|| ApiError::invalid_input(&state.catalog, &lang))?;

    debug!(size = data.len(), mime_type, "resume uploaded");

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidInput,
            "File size exceeds the maximum limit of 5MB",
        ));
    }

    if !extract::is_supported(&mime_type) {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorCode::InvalidInput,
            format!(
                "Unsupported file type. Supported types are: {}",
                SUPPORTED_MIME_TYPES.join(", ")
            ),
        ));
    }

    let file_content = extract::extract_text(&data, &mime_type)
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(UploadResumeResponse { file_content }))
}
