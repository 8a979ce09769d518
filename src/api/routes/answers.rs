use axum::{
    extract::{Extension, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::response::{map_domain, ok, ApiResult, Lang};
use crate::api::state::AppState;
use crate::application::AnswerRequest;
use crate::infrastructure::Claims;

fn default_language() -> String {
    "English".to_string()
}

#[derive(Debug, Deserialize)]
pub struct GenerateAnswerRequest {
    pub interview_id: Uuid,
    #[serde(default)]
    pub job_position: String,
    #[serde(default)]
    pub question: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub resume_content: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateAnswerResponse {
    pub response: String,
    pub remaining_credits: i64,
}

pub async fn generate_answer(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(_claims): Extension<Claims>,
    Json(request): Json<GenerateAnswerRequest>,
) -> ApiResult<GenerateAnswerResponse> {
    let outcome = state
        .answers
        .generate(&AnswerRequest {
            interview_id: request.interview_id,
            job_position: request.job_position,
            question: request.question,
            language: request.language,
            resume_content: request.resume_content,
        })
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(GenerateAnswerResponse {
        response: outcome.answer,
        remaining_credits: outcome.remaining_credits,
    }))
}
