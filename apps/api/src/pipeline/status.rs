//! Pipeline status derivation.
//!
//! A candidate gets a terminal decision only once a scored technical round
//! and a scored director round both exist. The decision score is the mean of
//! the most recent scored round of each type: `hired` at or above 70,
//! `rejected` below. With only one of the two, the status is left as it was.
//! HR rounds never drive a decision.
//!
//! Saving a round and reading a candidate go through the same
//! [`overall_for`], so the stored status always matches the reported score.

use serde::Serialize;

use crate::models::candidate::CandidateStatus;
use crate::models::interview::{Interview, RoundType};
use crate::pipeline::scoring::passes;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusOutcome {
    pub status: CandidateStatus,
    /// Mean of the two decision rounds, when both exist.
    pub overall_score: Option<f64>,
}

pub fn overall_score(technical: f64, director: f64) -> f64 {
    (technical + director) / 2.0
}

pub fn decide(overall: f64) -> CandidateStatus {
    if passes(overall) {
        CandidateStatus::Hired
    } else {
        CandidateStatus::Rejected
    }
}

/// Most recently created scored round of a type.
fn latest_scored(interviews: &[Interview], round_type: RoundType) -> Option<&Interview> {
    interviews
        .iter()
        .filter(|i| i.round_type == round_type && i.is_scored())
        .max_by_key(|i| i.created_at)
}

/// Decision score over a candidate's rounds, if both decision rounds are scored.
pub fn overall_for(interviews: &[Interview]) -> Option<f64> {
    let technical = latest_scored(interviews, RoundType::Technical)?.score?;
    let director = latest_scored(interviews, RoundType::Director)?.score?;
    Some(overall_score(technical, director))
}

/// Status after `saved` is written, given the candidate's other rounds.
/// A stale copy of `saved` in `others` is ignored.
pub fn derive_status(
    saved: &Interview,
    others: &[Interview],
    current_status: CandidateStatus,
) -> StatusOutcome {
    let mut rounds: Vec<Interview> = others
        .iter()
        .filter(|i| i.id != saved.id)
        .cloned()
        .collect();
    rounds.push(saved.clone());
    let overall = overall_for(&rounds);

    let decides = saved.is_scored() && saved.round_type.decision_partner().is_some();
    match overall {
        Some(overall) if decides => StatusOutcome {
            status: decide(overall),
            overall_score: Some(overall),
        },
        _ => StatusOutcome {
            status: current_status,
            overall_score: overall,
        },
    }
}
