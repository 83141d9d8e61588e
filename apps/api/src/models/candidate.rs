use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline status of a candidate.
///
/// `Completed` comes from an earlier revision of the table and is only ever
/// read, never written.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CandidateStatus {
    InProgress,
    Hired,
    Rejected,
    Completed,
}

impl CandidateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::InProgress => "in_progress",
            CandidateStatus::Hired => "hired",
            CandidateStatus::Rejected => "rejected",
            CandidateStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, CandidateStatus::InProgress)
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the `candidates` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: CandidateStatus,
    pub user_id: Uuid,
}

/// Insert payload for the `candidates` table.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateInsert {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: CandidateStatus,
    pub user_id: Uuid,
}

/// Partial update for the `candidates` table. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CandidatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CandidateStatus>,
}

impl CandidatePatch {
    pub fn status(status: CandidateStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.status.is_none()
    }
}
