//! Axum route handlers for the Interviews API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::service::{
    self, InterviewInput, InterviewPreview, PreviewRequest, SaveInterviewResponse, ScheduleRequest,
};
use crate::models::interview::Interview;
use crate::models::user::Session;
use crate::state::AppState;
use crate::validation::ConfirmQuery;

/// GET /api/v1/candidates/:id/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(candidate_id): Path<Uuid>,
) -> Result<Json<Vec<Interview>>, AppError> {
    let interviews = state.store.list_interviews(&session, candidate_id).await?;
    Ok(Json(interviews))
}

/// POST /api/v1/candidates/:id/interviews
pub async fn handle_record_interview(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(candidate_id): Path<Uuid>,
    Json(input): Json<InterviewInput>,
) -> Result<(StatusCode, Json<SaveInterviewResponse>), AppError> {
    let response =
        service::record_interview(state.store.as_ref(), &session, candidate_id, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/candidates/:id/interviews/preview
pub async fn handle_preview_interview(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(candidate_id): Path<Uuid>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<InterviewPreview>, AppError> {
    let preview =
        service::preview_interview(state.store.as_ref(), &session, candidate_id, request).await?;
    Ok(Json(preview))
}

/// POST /api/v1/candidates/:id/interviews/schedule
pub async fn handle_schedule_interview(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(candidate_id): Path<Uuid>,
    Json(request): Json<ScheduleRequest>,
) -> Result<(StatusCode, Json<Interview>), AppError> {
    let interview =
        service::schedule_interview(state.store.as_ref(), &session, candidate_id, request).await?;
    Ok((StatusCode::CREATED, Json(interview)))
}

/// PATCH /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(interview_id): Path<Uuid>,
    Json(input): Json<InterviewInput>,
) -> Result<Json<SaveInterviewResponse>, AppError> {
    let response =
        service::update_interview(state.store.as_ref(), &session, interview_id, input).await?;
    Ok(Json(response))
}

/// DELETE /api/v1/interviews/:id?confirm=true
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(interview_id): Path<Uuid>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<StatusCode, AppError> {
    confirm.require("an interview")?;
    service::delete_interview(state.store.as_ref(), &session, interview_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
