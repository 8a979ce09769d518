use axum::{
    extract::{Extension, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::response::{map_domain, ok, ApiError, ApiResult, Lang};
use crate::api::state::AppState;
use crate::domain::pagination::{PageInfo, PageRequest};
use crate::domain::Interview;
use crate::infrastructure::Claims;

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub id: Uuid,
    pub position_name: String,
    pub resume_url: String,
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: Option<chrono::DateTime<chrono::Utc>>,
    pub duration_minutes: Option<i64>,
    pub active: bool,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            position_name: interview.position_name,
            resume_url: interview.resume_url,
            start_time: interview.start_time,
            end_time: interview.end_time,
            duration_minutes: interview.duration_minutes,
            active: interview.active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    #[serde(default)]
    pub position_name: String,
    #[serde(default)]
    pub resume_url: String,
}

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub message: String,
    pub interview_id: Uuid,
}

pub async fn start_interview(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(claims): Extension<Claims>,
    Json(request): Json<StartInterviewRequest>,
) -> ApiResult<StartInterviewResponse> {
    if request.position_name.is_empty() || request.resume_url.is_empty() {
        return Err(ApiError::invalid_input(&state.catalog, &lang));
    }

    let interview = state
        .interviews
        .start(claims.sub, &request.position_name, &request.resume_url)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(StartInterviewResponse {
        message: state.catalog.translate(&lang, "interview_started"),
        interview_id: interview.id,
    }))
}

#[derive(Debug, Serialize)]
pub struct EndInterviewResponse {
    pub message: String,
    pub duration_minutes: i64,
}

pub async fn end_interview(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(claims): Extension<Claims>,
) -> ApiResult<EndInterviewResponse> {
    let interview = state
        .interviews
        .end_by_user(claims.sub)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(EndInterviewResponse {
        message: state.catalog.translate(&lang, "interview_ended"),
        duration_minutes: interview.duration_minutes.unwrap_or(0),
    }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub interviews: Vec<InterviewResponse>,
    pub pagination: PageInfo,
}

pub async fn interview_history(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<HistoryResponse> {
    let page = PageRequest::new(query.page, query.limit);
    let (interviews, pagination) = state
        .interviews
        .history(claims.sub, page)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(HistoryResponse {
        interviews: interviews.into_iter().map(Into::into).collect(),
        pagination,
    }))
}
