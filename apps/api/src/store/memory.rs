//! In-memory `Store` for handler tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{CandidatePage, Store};
use crate::backend::rest::RowRange;
use crate::backend::BackendError;
use crate::models::candidate::{Candidate, CandidateInsert, CandidatePatch, CandidateStatus};
use crate::models::interview::{Interview, InterviewRecord};
use crate::models::user::Session;

#[derive(Default)]
pub struct MemoryStore {
    candidates: Mutex<Vec<Candidate>>,
    interviews: Mutex<Vec<Interview>>,
    /// Makes interview inserts fail with a backend error.
    pub fail_interview_inserts: AtomicBool,
    clock: Mutex<i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strictly increasing timestamps so ordering is deterministic.
    fn tick(&self) -> chrono::DateTime<Utc> {
        let mut clock = self.clock.lock().unwrap();
        *clock += 1;
        Utc::now() + Duration::milliseconds(*clock)
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.candidates.lock().unwrap().clone()
    }

    pub fn interviews(&self) -> Vec<Interview> {
        self.interviews.lock().unwrap().clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_candidates(
        &self,
        _session: &Session,
        status: Option<CandidateStatus>,
    ) -> Result<Vec<Candidate>, BackendError> {
        let mut rows: Vec<Candidate> = self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn page_candidates(
        &self,
        session: &Session,
        status: Option<CandidateStatus>,
        range: RowRange,
    ) -> Result<CandidatePage, BackendError> {
        let all = self.list_candidates(session, status).await?;
        let rows = all
            .iter()
            .skip(range.from)
            .take(range.to.saturating_sub(range.from).saturating_add(1))
            .cloned()
            .collect();
        Ok(CandidatePage {
            rows,
            total: all.len(),
        })
    }

    async fn get_candidate(
        &self,
        _session: &Session,
        id: Uuid,
    ) -> Result<Option<Candidate>, BackendError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn insert_candidate(
        &self,
        _session: &Session,
        row: &CandidateInsert,
    ) -> Result<Candidate, BackendError> {
        let candidate = Candidate {
            id: Uuid::new_v4(),
            created_at: self.tick(),
            name: row.name.clone(),
            email: row.email.clone(),
            phone: row.phone.clone(),
            status: row.status,
            user_id: row.user_id,
        };
        self.candidates.lock().unwrap().push(candidate.clone());
        Ok(candidate)
    }

    async fn update_candidate(
        &self,
        _session: &Session,
        id: Uuid,
        patch: &CandidatePatch,
    ) -> Result<Option<Candidate>, BackendError> {
        let mut rows = self.candidates.lock().unwrap();
        let Some(candidate) = rows.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            candidate.name = name.clone();
        }
        if let Some(email) = &patch.email {
            candidate.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            candidate.phone = Some(phone.clone());
        }
        if let Some(status) = patch.status {
            candidate.status = status;
        }
        Ok(Some(candidate.clone()))
    }

    async fn delete_candidate(&self, _session: &Session, id: Uuid) -> Result<bool, BackendError> {
        let mut rows = self.candidates.lock().unwrap();
        let before = rows.len();
        rows.retain(|c| c.id != id);
        let deleted = rows.len() != before;
        if deleted {
            // mirrors an ON DELETE CASCADE foreign key
            self.interviews
                .lock()
                .unwrap()
                .retain(|i| i.candidate_id != id);
        }
        Ok(deleted)
    }

    async fn list_interviews(
        &self,
        _session: &Session,
        candidate_id: Uuid,
    ) -> Result<Vec<Interview>, BackendError> {
        let mut rows: Vec<Interview> = self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.candidate_id == candidate_id)
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.created_at);
        Ok(rows)
    }

    async fn get_interview(
        &self,
        _session: &Session,
        id: Uuid,
    ) -> Result<Option<Interview>, BackendError> {
        Ok(self
            .interviews
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn insert_interview(
        &self,
        _session: &Session,
        row: &InterviewRecord,
    ) -> Result<Interview, BackendError> {
        if self.fail_interview_inserts.load(Ordering::SeqCst) {
            return Err(BackendError::Api {
                status: 500,
                message: "insert failed".to_string(),
            });
        }
        let interview = Interview {
            id: Uuid::new_v4(),
            created_at: self.tick(),
            candidate_id: row.candidate_id,
            round_type: row.round_type,
            round_index: row.round_index,
            score: row.score,
            feedback: Some(row.feedback.clone()),
            user_id: row.user_id,
            details: row.details.clone(),
            scheduled_at: row.scheduled_at,
        };
        self.interviews.lock().unwrap().push(interview.clone());
        Ok(interview)
    }

    async fn update_interview(
        &self,
        _session: &Session,
        id: Uuid,
        row: &InterviewRecord,
    ) -> Result<Option<Interview>, BackendError> {
        let mut rows = self.interviews.lock().unwrap();
        let Some(interview) = rows.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        interview.round_type = row.round_type;
        interview.round_index = row.round_index;
        interview.score = row.score;
        interview.feedback = Some(row.feedback.clone());
        interview.details = row.details.clone();
        interview.scheduled_at = row.scheduled_at;
        Ok(Some(interview.clone()))
    }

    async fn delete_interview(&self, _session: &Session, id: Uuid) -> Result<bool, BackendError> {
        let mut rows = self.interviews.lock().unwrap();
        let before = rows.len();
        rows.retain(|i| i.id != id);
        Ok(rows.len() != before)
    }
}
