use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::rest::RowRange;
use crate::errors::AppError;
use crate::interviews::service::{scheduled_record, ScheduleRequest};
use crate::models::candidate::{Candidate, CandidateInsert, CandidatePatch, CandidateStatus};
use crate::models::interview::{Interview, RoundType};
use crate::models::user::Session;
use crate::pipeline::board::{build_board, filter_candidates, paginate, Board, Page, PageRequest};
use crate::pipeline::status::overall_for;
use crate::store::Store;
use crate::validation::{optional_text, require_text, validate_email};

pub const SCHEDULE_WARNING: &str =
    "Candidate added, but the interview could not be scheduled. Please reschedule it manually.";

#[derive(Debug, Deserialize)]
pub struct CreateCandidateRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional first round to put on the calendar right away.
    #[serde(default)]
    pub schedule: Option<ScheduleRequest>,
}

#[derive(Debug, Serialize)]
pub struct CreateCandidateResponse {
    pub candidate: Candidate,
    pub scheduled_interview: Option<Interview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCandidateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub status: Option<CandidateStatus>,
}

/// One step of the interview process on the detail page.
#[derive(Debug, Clone, Serialize)]
pub struct Stage {
    pub round_type: RoundType,
    /// At least one round of this type has a score.
    pub completed: bool,
    pub can_add: bool,
    pub rounds: Vec<Interview>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateDetail {
    pub candidate: Candidate,
    pub interviews: Vec<Interview>,
    pub stages: Vec<Stage>,
    pub overall_score: Option<f64>,
}

/// Technical, then director, then HR. Only one director round is allowed.
pub fn build_stages(interviews: &[Interview]) -> Vec<Stage> {
    [RoundType::Technical, RoundType::Director, RoundType::Hr]
        .into_iter()
        .map(|round_type| {
            let rounds: Vec<Interview> = interviews
                .iter()
                .filter(|i| i.round_type == round_type)
                .cloned()
                .collect();
            Stage {
                round_type,
                completed: rounds.iter().any(Interview::is_scored),
                can_add: round_type != RoundType::Director || rounds.is_empty(),
                rounds,
            }
        })
        .collect()
}

/// GET /api/v1/candidates
///
/// Without a search term the store does the slicing and counting. Search
/// matches on name or email, so those rows are filtered here.
pub async fn list_candidates(
    store: &dyn Store,
    session: &Session,
    status: Option<CandidateStatus>,
    search: Option<&str>,
    page: PageRequest,
) -> Result<Page<Candidate>, AppError> {
    let term = search.map(str::trim).filter(|t| !t.is_empty());
    let Some(term) = term else {
        let from = page.offset();
        let range = RowRange {
            from,
            to: from.saturating_add(page.per_page() - 1),
        };
        let slice = store.page_candidates(session, status, range).await?;
        return Ok(Page::from_slice(slice.rows, slice.total, page));
    };

    let rows = store.list_candidates(session, status).await?;
    let filtered = filter_candidates(&rows, Some(term));
    Ok(paginate(&filtered, page))
}

/// GET /api/v1/dashboard
pub async fn dashboard(
    store: &dyn Store,
    session: &Session,
    search: Option<&str>,
    page: PageRequest,
) -> Result<Board, AppError> {
    let rows = store.list_candidates(session, None).await?;
    Ok(build_board(&rows, search, page))
}

/// POST /api/v1/candidates
///
/// The candidate insert and the optional schedule insert are separate calls.
/// If the second one fails the candidate stays and the caller gets a warning.
pub async fn create_candidate(
    store: &dyn Store,
    session: &Session,
    request: CreateCandidateRequest,
) -> Result<CreateCandidateResponse, AppError> {
    let row = CandidateInsert {
        name: require_text("name", &request.name)?,
        email: validate_email(&request.email)?,
        phone: optional_text(request.phone.as_deref()),
        status: CandidateStatus::InProgress,
        user_id: session.user.id,
    };
    let candidate = store.insert_candidate(session, &row).await?;
    info!("Added candidate {}", candidate.id);

    let Some(schedule) = request.schedule else {
        return Ok(CreateCandidateResponse {
            candidate,
            scheduled_interview: None,
            warning: None,
        });
    };

    let record = scheduled_record(
        candidate.id,
        session.user.id,
        schedule.round_type,
        1,
        schedule.scheduled_at,
    );
    match store.insert_interview(session, &record).await {
        Ok(interview) => Ok(CreateCandidateResponse {
            candidate,
            scheduled_interview: Some(interview),
            warning: None,
        }),
        Err(e) => {
            warn!(
                "Candidate {} added but scheduling failed: {e}",
                candidate.id
            );
            Ok(CreateCandidateResponse {
                candidate,
                scheduled_interview: None,
                warning: Some(SCHEDULE_WARNING.to_string()),
            })
        }
    }
}

/// GET /api/v1/candidates/:id
pub async fn candidate_detail(
    store: &dyn Store,
    session: &Session,
    id: Uuid,
) -> Result<CandidateDetail, AppError> {
    let candidate = store
        .get_candidate(session, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    let interviews = store.list_interviews(session, id).await?;

    Ok(CandidateDetail {
        stages: build_stages(&interviews),
        overall_score: overall_for(&interviews),
        candidate,
        interviews,
    })
}

/// PATCH /api/v1/candidates/:id
pub async fn update_candidate(
    store: &dyn Store,
    session: &Session,
    id: Uuid,
    request: UpdateCandidateRequest,
) -> Result<Candidate, AppError> {
    if request.status == Some(CandidateStatus::Completed) {
        return Err(AppError::Validation(
            "status must be one of in_progress, hired, rejected".to_string(),
        ));
    }

    let patch = CandidatePatch {
        name: request
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?,
        email: request.email.as_deref().map(validate_email).transpose()?,
        phone: request.phone.map(|p| p.trim().to_string()),
        status: request.status,
    };
    if patch.is_empty() {
        return Err(AppError::Validation("nothing to update".to_string()));
    }

    let candidate = store
        .update_candidate(session, id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))?;
    info!("Updated candidate {id}");
    Ok(candidate)
}

/// DELETE /api/v1/candidates/:id
pub async fn delete_candidate(store: &dyn Store, session: &Session, id: Uuid) -> Result<(), AppError> {
    if !store.delete_candidate(session, id).await? {
        return Err(AppError::NotFound(format!("Candidate {id} not found")));
    }
    info!("Deleted candidate {id}");
    Ok(())
}
