use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::pipeline::scoring::{clamp_rating, director_total, technical_total};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Technical,
    Hr,
    Director,
}

impl RoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoundType::Technical => "technical",
            RoundType::Hr => "hr",
            RoundType::Director => "director",
        }
    }

    /// The round whose score is averaged with this one for a hiring decision.
    pub fn decision_partner(&self) -> Option<RoundType> {
        match self {
            RoundType::Technical => Some(RoundType::Director),
            RoundType::Director => Some(RoundType::Technical),
            RoundType::Hr => None,
        }
    }
}

impl std::fmt::Display for RoundType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `interviews` table. `score` is `None` for a round that has
/// been scheduled but not scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interview {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub candidate_id: Uuid,
    pub round_type: RoundType,
    #[serde(default = "default_round_index")]
    pub round_index: i32,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    pub user_id: Uuid,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

fn default_round_index() -> i32 {
    1
}

impl Interview {
    pub fn is_scored(&self) -> bool {
        self.score.is_some()
    }
}

/// Write payload for the `interviews` table, used for both insert and update.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InterviewRecord {
    pub candidate_id: Uuid,
    pub round_type: RoundType,
    pub round_index: i32,
    pub score: Option<f64>,
    pub feedback: String,
    pub user_id: Uuid,
    pub details: Option<Value>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Score breakdowns
// ────────────────────────────────────────────────────────────────────────────

/// Technical round categories, each rated 0–10. Missing categories read as 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TechnicalScoreBreakdown {
    pub programming_fundamentals: f64,
    pub database_system: f64,
    pub code_quality: f64,
    pub dsa: f64,
    pub cicd: f64,
    pub error_handling: f64,
}

impl TechnicalScoreBreakdown {
    pub fn categories(&self) -> [f64; 6] {
        [
            self.programming_fundamentals,
            self.database_system,
            self.code_quality,
            self.dsa,
            self.cicd,
            self.error_handling,
        ]
    }

    pub fn clamped(self) -> Self {
        Self {
            programming_fundamentals: clamp_rating(self.programming_fundamentals),
            database_system: clamp_rating(self.database_system),
            code_quality: clamp_rating(self.code_quality),
            dsa: clamp_rating(self.dsa),
            cicd: clamp_rating(self.cicd),
            error_handling: clamp_rating(self.error_handling),
        }
    }
}

/// Director round categories, each rated 0–10. Missing categories read as 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DirectorScoreBreakdown {
    pub personality: f64,
    pub communication: f64,
    pub team_work: f64,
    pub problem_solving: f64,
    pub prompt_engineering: f64,
}

impl DirectorScoreBreakdown {
    pub fn categories(&self) -> [f64; 5] {
        [
            self.personality,
            self.communication,
            self.team_work,
            self.problem_solving,
            self.prompt_engineering,
        ]
    }

    pub fn clamped(self) -> Self {
        Self {
            personality: clamp_rating(self.personality),
            communication: clamp_rating(self.communication),
            team_work: clamp_rating(self.team_work),
            problem_solving: clamp_rating(self.problem_solving),
            prompt_engineering: clamp_rating(self.prompt_engineering),
        }
    }
}

/// Per-category ratings. The shape is chosen by the round type, so the
/// stored JSON carries no tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBreakdown {
    Technical(TechnicalScoreBreakdown),
    Director(DirectorScoreBreakdown),
}

impl ScoreBreakdown {
    /// Reads `details` for a round type. HR rounds have no breakdown, so any
    /// non-null details for them is an error. Ratings are clamped to 0–10.
    pub fn parse(round_type: RoundType, details: &Value) -> Result<Option<Self>, String> {
        if details.is_null() {
            return Ok(None);
        }
        match round_type {
            RoundType::Technical => serde_json::from_value::<TechnicalScoreBreakdown>(details.clone())
                .map(|b| Some(ScoreBreakdown::Technical(b.clamped())))
                .map_err(|e| format!("invalid technical breakdown: {e}")),
            RoundType::Director => serde_json::from_value::<DirectorScoreBreakdown>(details.clone())
                .map(|b| Some(ScoreBreakdown::Director(b.clamped())))
                .map_err(|e| format!("invalid director breakdown: {e}")),
            RoundType::Hr => Err("hr rounds do not take a score breakdown".to_string()),
        }
    }

    /// Percentage total derived from the category ratings.
    pub fn total(&self) -> u32 {
        match self {
            ScoreBreakdown::Technical(b) => technical_total(b),
            ScoreBreakdown::Director(b) => director_total(b),
        }
    }

    pub fn to_value(&self) -> Value {
        // Both shapes are plain structs of f64, serialization cannot fail.
        match self {
            ScoreBreakdown::Technical(b) => serde_json::to_value(b).unwrap_or(Value::Null),
            ScoreBreakdown::Director(b) => serde_json::to_value(b).unwrap_or(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_technical_fills_missing_with_zero() {
        let parsed = ScoreBreakdown::parse(RoundType::Technical, &json!({ "dsa": 8, "cicd": 4 }))
            .unwrap()
            .unwrap();
        match parsed {
            ScoreBreakdown::Technical(b) => {
                assert_eq!(b.dsa, 8.0);
                assert_eq!(b.cicd, 4.0);
                assert_eq!(b.code_quality, 0.0);
            }
            other => panic!("expected technical breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_clamps_ratings() {
        let parsed = ScoreBreakdown::parse(
            RoundType::Director,
            &json!({ "personality": 14, "communication": -3 }),
        )
        .unwrap()
        .unwrap();
        match parsed {
            ScoreBreakdown::Director(b) => {
                assert_eq!(b.personality, 10.0);
                assert_eq!(b.communication, 0.0);
            }
            other => panic!("expected director breakdown, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_hr_details() {
        assert!(ScoreBreakdown::parse(RoundType::Hr, &json!({ "dsa": 1 })).is_err());
        assert_eq!(ScoreBreakdown::parse(RoundType::Hr, &Value::Null), Ok(None));
    }

    #[test]
    fn test_parse_rejects_non_numeric_rating() {
        let err = ScoreBreakdown::parse(RoundType::Technical, &json!({ "dsa": "eight" }));
        assert!(err.is_err());
    }

    #[test]
    fn test_interview_row_defaults() {
        let row = json!({
            "id": "3c2b1a09-8f7e-4d6c-9b5a-4e3d2c1b0a98",
            "created_at": "2024-05-02T12:00:00+00:00",
            "candidate_id": "7f1c2a9e-5b8d-4c3e-9a61-2f0e8d7c6b5a",
            "round_type": "technical",
            "user_id": "0d9e8f7a-6b5c-4d3e-8f2a-1b0c9d8e7f6a",
            "details": { "programming_fundamentals": 6, "database_system": 6,
                         "code_quality": 6, "dsa": 6, "cicd": 6, "error_handling": 6 }
        });
        let interview: Interview = serde_json::from_value(row).unwrap();
        assert_eq!(interview.round_index, 1);
        assert!(!interview.is_scored());
        let breakdown = ScoreBreakdown::parse(interview.round_type, &interview.details.unwrap());
        assert_eq!(breakdown.unwrap().map(|b| b.total()), Some(60));
    }

    #[test]
    fn test_decision_partner() {
        assert_eq!(RoundType::Technical.decision_partner(), Some(RoundType::Director));
        assert_eq!(RoundType::Director.decision_partner(), Some(RoundType::Technical));
        assert_eq!(RoundType::Hr.decision_partner(), None);
    }
}
