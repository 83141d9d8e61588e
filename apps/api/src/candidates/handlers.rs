//! Axum route handlers for the Candidates API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::candidates::service::{
    self, CandidateDetail, CreateCandidateRequest, CreateCandidateResponse, UpdateCandidateRequest,
};
use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateStatus};
use crate::models::user::Session;
use crate::pipeline::board::{Board, Page, PageRequest};
use crate::state::AppState;
use crate::validation::ConfirmQuery;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<CandidateStatus>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListQuery {
    fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Page<Candidate>>, AppError> {
    let page = service::list_candidates(
        state.store.as_ref(),
        &session,
        params.status,
        params.search.as_deref(),
        params.page_request(),
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Board>, AppError> {
    let board = service::dashboard(
        state.store.as_ref(),
        &session,
        params.search.as_deref(),
        params.page_request(),
    )
    .await?;
    Ok(Json(board))
}

/// POST /api/v1/candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(req): Json<CreateCandidateRequest>,
) -> Result<(StatusCode, Json<CreateCandidateResponse>), AppError> {
    let response = service::create_candidate(state.store.as_ref(), &session, req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CandidateDetail>, AppError> {
    let detail = service::candidate_detail(state.store.as_ref(), &session, id).await?;
    Ok(Json(detail))
}

/// PATCH /api/v1/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCandidateRequest>,
) -> Result<Json<Candidate>, AppError> {
    let candidate = service::update_candidate(state.store.as_ref(), &session, id, req).await?;
    Ok(Json(candidate))
}

/// DELETE /api/v1/candidates/:id?confirm=true
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<Uuid>,
    Query(confirm): Query<ConfirmQuery>,
) -> Result<StatusCode, AppError> {
    confirm.require("a candidate")?;
    service::delete_candidate(state.store.as_ref(), &session, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
