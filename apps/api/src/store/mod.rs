//! Store: the `candidates` and `interviews` tables behind a trait.
//!
//! Default: `RestStore` over the hosted backend. `AppState` carries an
//! `Arc<dyn Store>` so handlers never see the HTTP layer.

use async_trait::async_trait;
use uuid::Uuid;

use crate::backend::rest::{Direction, Query, RowRange};
use crate::backend::{BackendClient, BackendError};
use crate::models::candidate::{Candidate, CandidateInsert, CandidatePatch, CandidateStatus};
use crate::models::interview::{Interview, InterviewRecord};
use crate::models::user::Session;

#[cfg(test)]
pub mod memory;

pub const CANDIDATES: &str = "candidates";
pub const INTERVIEWS: &str = "interviews";

/// One slice of the candidate list and the number of rows matching overall.
#[derive(Debug, Clone)]
pub struct CandidatePage {
    pub rows: Vec<Candidate>,
    pub total: usize,
}

#[async_trait]
pub trait Store: Send + Sync {
    /// All candidates, newest first, optionally of one status.
    async fn list_candidates(
        &self,
        session: &Session,
        status: Option<CandidateStatus>,
    ) -> Result<Vec<Candidate>, BackendError>;

    /// Rows `range.from..=range.to` of the same ordering, counted by the store.
    async fn page_candidates(
        &self,
        session: &Session,
        status: Option<CandidateStatus>,
        range: RowRange,
    ) -> Result<CandidatePage, BackendError>;

    async fn get_candidate(&self, session: &Session, id: Uuid)
        -> Result<Option<Candidate>, BackendError>;

    async fn insert_candidate(
        &self,
        session: &Session,
        row: &CandidateInsert,
    ) -> Result<Candidate, BackendError>;

    /// `None` when no row matched.
    async fn update_candidate(
        &self,
        session: &Session,
        id: Uuid,
        patch: &CandidatePatch,
    ) -> Result<Option<Candidate>, BackendError>;

    /// `false` when no row matched.
    async fn delete_candidate(&self, session: &Session, id: Uuid) -> Result<bool, BackendError>;

    /// Interviews of one candidate, oldest first.
    async fn list_interviews(
        &self,
        session: &Session,
        candidate_id: Uuid,
    ) -> Result<Vec<Interview>, BackendError>;

    async fn get_interview(&self, session: &Session, id: Uuid)
        -> Result<Option<Interview>, BackendError>;

    async fn insert_interview(
        &self,
        session: &Session,
        row: &InterviewRecord,
    ) -> Result<Interview, BackendError>;

    async fn update_interview(
        &self,
        session: &Session,
        id: Uuid,
        row: &InterviewRecord,
    ) -> Result<Option<Interview>, BackendError>;

    async fn delete_interview(&self, session: &Session, id: Uuid) -> Result<bool, BackendError>;
}

/// Table access through the backend's REST API. Every call runs with the
/// caller's access token, so row-level policies decide visibility.
pub struct RestStore {
    backend: BackendClient,
}

impl RestStore {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

fn by_id(id: Uuid) -> Query {
    Query::new().eq("id", id)
}

fn newest_first(status: Option<CandidateStatus>) -> Query {
    let query = Query::new().order("created_at", Direction::Desc);
    match status {
        Some(status) => query.eq("status", status),
        None => query,
    }
}

#[async_trait]
impl Store for RestStore {
    async fn list_candidates(
        &self,
        session: &Session,
        status: Option<CandidateStatus>,
    ) -> Result<Vec<Candidate>, BackendError> {
        self.backend
            .select(&session.access_token, CANDIDATES, &newest_first(status))
            .await
    }

    async fn page_candidates(
        &self,
        session: &Session,
        status: Option<CandidateStatus>,
        range: RowRange,
    ) -> Result<CandidatePage, BackendError> {
        let query = newest_first(status).range(range);
        let (rows, total): (Vec<Candidate>, _) = self
            .backend
            .select_counted(&session.access_token, CANDIDATES, &query)
            .await?;
        Ok(CandidatePage {
            total: total.unwrap_or(range.from + rows.len()),
            rows,
        })
    }

    async fn get_candidate(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Option<Candidate>, BackendError> {
        let rows: Vec<Candidate> = self
            .backend
            .select(&session.access_token, CANDIDATES, &by_id(id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_candidate(
        &self,
        session: &Session,
        row: &CandidateInsert,
    ) -> Result<Candidate, BackendError> {
        self.backend
            .insert(&session.access_token, CANDIDATES, row)
            .await
    }

    async fn update_candidate(
        &self,
        session: &Session,
        id: Uuid,
        patch: &CandidatePatch,
    ) -> Result<Option<Candidate>, BackendError> {
        let rows: Vec<Candidate> = self
            .backend
            .update(&session.access_token, CANDIDATES, &by_id(id), patch)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_candidate(&self, session: &Session, id: Uuid) -> Result<bool, BackendError> {
        let rows: Vec<Candidate> = self
            .backend
            .delete(&session.access_token, CANDIDATES, &by_id(id))
            .await?;
        Ok(!rows.is_empty())
    }

    async fn list_interviews(
        &self,
        session: &Session,
        candidate_id: Uuid,
    ) -> Result<Vec<Interview>, BackendError> {
        let query = Query::new()
            .eq("candidate_id", candidate_id)
            .order("created_at", Direction::Asc);
        self.backend
            .select(&session.access_token, INTERVIEWS, &query)
            .await
    }

    async fn get_interview(
        &self,
        session: &Session,
        id: Uuid,
    ) -> Result<Option<Interview>, BackendError> {
        let rows: Vec<Interview> = self
            .backend
            .select(&session.access_token, INTERVIEWS, &by_id(id))
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_interview(
        &self,
        session: &Session,
        row: &InterviewRecord,
    ) -> Result<Interview, BackendError> {
        self.backend
            .insert(&session.access_token, INTERVIEWS, row)
            .await
    }

    async fn update_interview(
        &self,
        session: &Session,
        id: Uuid,
        row: &InterviewRecord,
    ) -> Result<Option<Interview>, BackendError> {
        let rows: Vec<Interview> = self
            .backend
            .update(&session.access_token, INTERVIEWS, &by_id(id), row)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_interview(&self, session: &Session, id: Uuid) -> Result<bool, BackendError> {
        let rows: Vec<Interview> = self
            .backend
            .delete(&session.access_token, INTERVIEWS, &by_id(id))
            .await?;
        Ok(!rows.is_empty())
    }
}
