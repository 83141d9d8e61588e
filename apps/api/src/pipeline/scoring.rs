//! Interview scoring: category ratings to percentage totals.
//!
//! Technical: six categories, max 60. Director: five categories, max 50.
//! Total = round(sum / max × 100).

use crate::models::interview::{DirectorScoreBreakdown, TechnicalScoreBreakdown};

pub const RATING_MAX: f64 = 10.0;
pub const TECHNICAL_MAX: f64 = 60.0;
pub const DIRECTOR_MAX: f64 = 50.0;
/// A round (or the mean of both decision rounds) at or above this passes.
pub const PASS_THRESHOLD: f64 = 70.0;
pub const SCORE_MAX: f64 = 100.0;

/// Clamps a single category rating into [0, 10].
pub fn clamp_rating(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, RATING_MAX)
}

/// round(sum / max × 100), half rounded up.
pub fn percentage(sum: f64, max: f64) -> u32 {
    ((sum / max) * 100.0).round().max(0.0) as u32
}

pub fn technical_total(breakdown: &TechnicalScoreBreakdown) -> u32 {
    percentage(breakdown.categories().iter().sum(), TECHNICAL_MAX)
}

pub fn director_total(breakdown: &DirectorScoreBreakdown) -> u32 {
    percentage(breakdown.categories().iter().sum(), DIRECTOR_MAX)
}

pub fn passes(score: f64) -> bool {
    score >= PASS_THRESHOLD
}

/// Rounds scored without a breakdown take a manual 0–100 score.
pub fn validate_manual_score(score: f64) -> Result<f64, String> {
    if !score.is_finite() || !(0.0..=SCORE_MAX).contains(&score) {
        return Err(format!("score must be between 0 and 100, got {score}"));
    }
    Ok(score)
}
