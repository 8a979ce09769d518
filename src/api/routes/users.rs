use axum::extract::{Extension, State};
use serde::Serialize;

use crate::api::response::{map_domain, ok, ApiResult, Lang};
use crate::api::routes::interviews::InterviewResponse;
use crate::api::state::AppState;
use crate::infrastructure::Claims;

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub username: String,
    pub credits: i64,
    pub is_verified: bool,
    /// The ongoing interview, if any, as a (0- or 1-element) list.
    pub interviews: Vec<InterviewResponse>,
}

pub async fn user_info(
    State(state): State<AppState>,
    Lang(lang): Lang,
    Extension(claims): Extension<Claims>,
) -> ApiResult<UserInfoResponse> {
    let user = state
        .users
        .get(claims.sub)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    let ongoing = state
        .interviews
        .ongoing_by_user(claims.sub)
        .await
        .map_err(|e| map_domain(e, &state.catalog, &lang))?;

    Ok(ok(UserInfoResponse {
        username: user.username,
        credits: user.credits,
        is_verified: user.is_verified,
        interviews: ongoing.into_iter().map(Into::into).collect(),
    }))
}
