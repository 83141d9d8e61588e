//! Interview workflow: score a round, derive the candidate's resulting status,
//! write both back to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidatePatch, CandidateStatus};
use crate::models::interview::{Interview, InterviewRecord, RoundType, ScoreBreakdown};
use crate::models::user::Session;
use crate::pipeline::scoring::{passes, validate_manual_score};
use crate::pipeline::status::{derive_status, StatusOutcome};
use crate::store::Store;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Body of the record, preview and edit requests. `round_type` is required
/// when recording a new round and defaults to the stored one when editing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterviewInput {
    #[serde(default)]
    pub round_type: Option<RoundType>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl InterviewInput {
    fn has_scoring(&self) -> bool {
        self.score.is_some() || self.details.as_ref().is_some_and(|d| !d.is_null())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    #[serde(flatten)]
    pub input: InterviewInput,
    /// Set when previewing an edit, so the stored version is not counted twice.
    #[serde(default)]
    pub interview_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleRequest {
    pub round_type: RoundType,
    pub scheduled_at: DateTime<Utc>,
}

/// A round's final score and the normalized breakdown it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRound {
    pub round_type: RoundType,
    pub score: f64,
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InterviewPreview {
    pub round_type: RoundType,
    pub score: f64,
    pub passed: bool,
    pub resulting_status: CandidateStatus,
    pub overall_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveInterviewResponse {
    pub interview: Interview,
    pub candidate_status: CandidateStatus,
    pub overall_score: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pure helpers
// ────────────────────────────────────────────────────────────────────────────

/// Breakdown totals win over a client-sent score; rounds without a breakdown
/// need a manual score between 0 and 100.
pub fn score_round(
    round_type: RoundType,
    score: Option<f64>,
    details: Option<&Value>,
) -> Result<ScoredRound, AppError> {
    let breakdown = match details {
        Some(details) => ScoreBreakdown::parse(round_type, details).map_err(AppError::Validation)?,
        None => None,
    };

    if let Some(breakdown) = breakdown {
        return Ok(ScoredRound {
            round_type,
            score: f64::from(breakdown.total()),
            details: Some(breakdown.to_value()),
        });
    }

    let score = score.ok_or_else(|| {
        AppError::Validation(format!(
            "a {round_type} round needs a score or a score breakdown"
        ))
    })?;
    Ok(ScoredRound {
        round_type,
        score: validate_manual_score(score).map_err(AppError::Validation)?,
        details: None,
    })
}

/// Rounds of a type are numbered from 1 in insertion order.
pub fn next_round_index(interviews: &[Interview], round_type: RoundType) -> i32 {
    let existing = interviews.iter().filter(|i| i.round_type == round_type).count();
    i32::try_from(existing).unwrap_or(i32::MAX - 1) + 1
}

/// A candidate has at most one director round. `interviews` must not hold
/// the round being edited.
pub fn ensure_director_slot(interviews: &[Interview], round_type: RoundType) -> Result<(), AppError> {
    if round_type != RoundType::Director {
        return Ok(());
    }
    if interviews.iter().any(|i| i.round_type == RoundType::Director) {
        return Err(AppError::Conflict(
            "a director round already exists for this candidate; edit it instead".to_string(),
        ));
    }
    Ok(())
}

fn without(interviews: Vec<Interview>, excluding: Uuid) -> Vec<Interview> {
    interviews.into_iter().filter(|i| i.id != excluding).collect()
}

pub fn scheduled_record(
    candidate_id: Uuid,
    user_id: Uuid,
    round_type: RoundType,
    round_index: i32,
    scheduled_at: DateTime<Utc>,
) -> InterviewRecord {
    InterviewRecord {
        candidate_id,
        round_type,
        round_index,
        score: None,
        feedback: String::new(),
        user_id,
        details: None,
        scheduled_at: Some(scheduled_at),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store-backed operations
// ────────────────────────────────────────────────────────────────────────────

async fn load_candidate(
    store: &dyn Store,
    session: &Session,
    candidate_id: Uuid,
) -> Result<Candidate, AppError> {
    store
        .get_candidate(session, candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))
}

async fn load_interview(
    store: &dyn Store,
    session: &Session,
    interview_id: Uuid,
) -> Result<Interview, AppError> {
    store
        .get_interview(session, interview_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}

/// Writes the derived status back when it differs from the stored one.
async fn apply_status(
    store: &dyn Store,
    session: &Session,
    candidate: &Candidate,
    outcome: StatusOutcome,
) -> Result<CandidateStatus, AppError> {
    if outcome.status == candidate.status {
        return Ok(candidate.status);
    }
    store
        .update_candidate(session, candidate.id, &CandidatePatch::status(outcome.status))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", candidate.id)))?;
    if outcome.status.is_terminal() {
        info!(
            "Candidate {} decided: {} (overall {:?})",
            candidate.id, outcome.status, outcome.overall_score
        );
    } else {
        info!(
            "Candidate {} moved from {} to {}",
            candidate.id, candidate.status, outcome.status
        );
    }
    Ok(outcome.status)
}

/// POST /api/v1/candidates/:id/interviews
pub async fn record_interview(
    store: &dyn Store,
    session: &Session,
    candidate_id: Uuid,
    input: InterviewInput,
) -> Result<SaveInterviewResponse, AppError> {
    let round_type = input
        .round_type
        .ok_or_else(|| AppError::Validation("round_type is required".to_string()))?;

    let candidate = load_candidate(store, session, candidate_id).await?;
    let interviews = store.list_interviews(session, candidate_id).await?;
    ensure_director_slot(&interviews, round_type)?;

    let scored = score_round(round_type, input.score, input.details.as_ref())?;
    let record = InterviewRecord {
        candidate_id,
        round_type,
        round_index: next_round_index(&interviews, round_type),
        score: Some(scored.score),
        feedback: input.feedback.unwrap_or_default(),
        user_id: session.user.id,
        details: scored.details,
        scheduled_at: None,
    };
    let interview = store.insert_interview(session, &record).await?;
    info!(
        "Recorded {} round {} for candidate {candidate_id} (score {})",
        round_type, record.round_index, scored.score
    );

    let outcome = derive_status(&interview, &interviews, candidate.status);
    let candidate_status = apply_status(store, session, &candidate, outcome).await?;

    Ok(SaveInterviewResponse {
        interview,
        candidate_status,
        overall_score: outcome.overall_score,
    })
}

/// POST /api/v1/candidates/:id/interviews/preview. Nothing is written.
pub async fn preview_interview(
    store: &dyn Store,
    session: &Session,
    candidate_id: Uuid,
    request: PreviewRequest,
) -> Result<InterviewPreview, AppError> {
    let candidate = load_candidate(store, session, candidate_id).await?;
    let interviews = store.list_interviews(session, candidate_id).await?;

    let stored = request
        .interview_id
        .and_then(|id| interviews.iter().find(|i| i.id == id));
    let round_type = request
        .input
        .round_type
        .or(stored.map(|i| i.round_type))
        .ok_or_else(|| AppError::Validation("round_type is required".to_string()))?;

    let scored = score_round(round_type, request.input.score, request.input.details.as_ref())?;

    // An edit keeps its id and place in time; a new round is the latest one.
    let mut draft = match stored {
        Some(existing) => existing.clone(),
        None => Interview {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            candidate_id,
            round_type,
            round_index: next_round_index(&interviews, round_type),
            score: None,
            feedback: None,
            user_id: session.user.id,
            details: None,
            scheduled_at: None,
        },
    };
    draft.round_type = round_type;
    draft.score = Some(scored.score);
    draft.details = scored.details;

    let outcome = derive_status(&draft, &interviews, candidate.status);

    Ok(InterviewPreview {
        round_type,
        score: scored.score,
        passed: passes(scored.score),
        resulting_status: outcome.status,
        overall_score: outcome.overall_score,
    })
}

/// POST /api/v1/candidates/:id/interviews/schedule
pub async fn schedule_interview(
    store: &dyn Store,
    session: &Session,
    candidate_id: Uuid,
    request: ScheduleRequest,
) -> Result<Interview, AppError> {
    load_candidate(store, session, candidate_id).await?;
    let interviews = store.list_interviews(session, candidate_id).await?;
    ensure_director_slot(&interviews, request.round_type)?;

    let record = scheduled_record(
        candidate_id,
        session.user.id,
        request.round_type,
        next_round_index(&interviews, request.round_type),
        request.scheduled_at,
    );
    let interview = store.insert_interview(session, &record).await?;
    info!(
        "Scheduled {} round for candidate {candidate_id} at {}",
        request.round_type, request.scheduled_at
    );
    Ok(interview)
}

/// PATCH /api/v1/interviews/:id
///
/// The round keeps its index unless its type changes, in which case it is
/// numbered after the rounds already of the new type.
pub async fn update_interview(
    store: &dyn Store,
    session: &Session,
    interview_id: Uuid,
    input: InterviewInput,
) -> Result<SaveInterviewResponse, AppError> {
    let existing = load_interview(store, session, interview_id).await?;
    let candidate = load_candidate(store, session, existing.candidate_id).await?;
    let others = without(
        store.list_interviews(session, candidate.id).await?,
        existing.id,
    );

    let round_type = input.round_type.unwrap_or(existing.round_type);
    ensure_director_slot(&others, round_type)?;

    let scored = if input.has_scoring() {
        Some(score_round(round_type, input.score, input.details.as_ref())?)
    } else if round_type == existing.round_type {
        existing.score.map(|score| ScoredRound {
            round_type,
            score,
            details: existing.details.clone(),
        })
    } else {
        return Err(AppError::Validation(
            "changing the round type requires a new score".to_string(),
        ));
    };

    let round_index = if round_type == existing.round_type {
        existing.round_index
    } else {
        next_round_index(&others, round_type)
    };
    let record = InterviewRecord {
        candidate_id: existing.candidate_id,
        round_type,
        round_index,
        score: scored.as_ref().map(|s| s.score),
        feedback: input
            .feedback
            .or_else(|| existing.feedback.clone())
            .unwrap_or_default(),
        user_id: existing.user_id,
        details: match &scored {
            Some(s) => s.details.clone(),
            None => existing.details.clone(),
        },
        scheduled_at: existing.scheduled_at,
    };
    let interview = store
        .update_interview(session, interview_id, &record)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;
    info!("Updated interview {interview_id} for candidate {}", candidate.id);

    let outcome = derive_status(&interview, &others, candidate.status);
    let candidate_status = apply_status(store, session, &candidate, outcome).await?;

    Ok(SaveInterviewResponse {
        interview,
        candidate_status,
        overall_score: outcome.overall_score,
    })
}

/// DELETE /api/v1/interviews/:id. The candidate's status is left as it is.
pub async fn delete_interview(
    store: &dyn Store,
    session: &Session,
    interview_id: Uuid,
) -> Result<(), AppError> {
    if !store.delete_interview(session, interview_id).await? {
        return Err(AppError::NotFound(format!("Interview {interview_id} not found")));
    }
    info!("Deleted interview {interview_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn interview(round_type: RoundType) -> Interview {
        Interview {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            candidate_id: Uuid::nil(),
            round_type,
            round_index: 1,
            score: Some(50.0),
            feedback: None,
            user_id: Uuid::nil(),
            details: None,
            scheduled_at: None,
        }
    }

    #[test]
    fn test_breakdown_overrides_client_score() {
        let details = json!({
            "programming_fundamentals": 10, "database_system": 10, "code_quality": 10,
            "dsa": 10, "cicd": 10, "error_handling": 2
        });
        let scored = score_round(RoundType::Technical, Some(12.0), Some(&details)).unwrap();
        // 52 / 60 = 86.67 -> 87
        assert_eq!(scored.score, 87.0);
        assert_eq!(scored.details.unwrap()["error_handling"], json!(2.0));
    }

    #[test]
    fn test_manual_score_for_hr_round() {
        let scored = score_round(RoundType::Hr, Some(64.5), None).unwrap();
        assert_eq!(scored.score, 64.5);
        assert_eq!(scored.details, None);
    }

    #[test]
    fn test_missing_score_is_rejected() {
        assert!(score_round(RoundType::Director, None, None).is_err());
        assert!(score_round(RoundType::Hr, Some(101.0), None).is_err());
    }

    #[test]
    fn test_hr_breakdown_is_rejected() {
        let details = json!({ "personality": 5 });
        assert!(score_round(RoundType::Hr, Some(50.0), Some(&details)).is_err());
    }

    #[test]
    fn test_null_details_fall_back_to_manual_score() {
        let scored = score_round(RoundType::Technical, Some(40.0), Some(&Value::Null)).unwrap();
        assert_eq!(scored.score, 40.0);
    }

    #[test]
    fn test_next_round_index_counts_same_type() {
        let rounds = vec![
            interview(RoundType::Technical),
            interview(RoundType::Hr),
            interview(RoundType::Technical),
        ];
        assert_eq!(next_round_index(&rounds, RoundType::Technical), 3);
        assert_eq!(next_round_index(&rounds, RoundType::Director), 1);
    }

    #[test]
    fn test_director_slot() {
        let director = interview(RoundType::Director);
        let rounds = vec![director.clone(), interview(RoundType::Technical)];
        assert!(ensure_director_slot(&rounds, RoundType::Director).is_err());
        assert!(ensure_director_slot(&rounds, RoundType::Technical).is_ok());

        let editing_director = without(rounds, director.id);
        assert!(ensure_director_slot(&editing_director, RoundType::Director).is_ok());
    }
}
