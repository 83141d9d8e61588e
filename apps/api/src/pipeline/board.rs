//! Dashboard lanes and list pagination over rows already fetched from the store.

use serde::{Deserialize, Serialize};

use crate::models::candidate::{Candidate, CandidateStatus};

pub const DEFAULT_PER_PAGE: usize = 20;
pub const MAX_PER_PAGE: usize = 100;

/// 1-based page selection, read from the query string.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageRequest {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> usize {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }

    /// Zero-based index of the first row on the page.
    pub fn offset(&self) -> usize {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Wraps rows the store already sliced for `request`.
    pub fn from_slice(items: Vec<T>, total: usize, request: PageRequest) -> Self {
        let per_page = request.per_page();
        Page {
            items,
            total,
            page: request.page(),
            per_page,
            total_pages: total.div_ceil(per_page),
        }
    }
}

pub fn paginate<T: Clone>(rows: &[T], request: PageRequest) -> Page<T> {
    let items = rows
        .iter()
        .skip(request.offset())
        .take(request.per_page())
        .cloned()
        .collect();
    Page::from_slice(items, rows.len(), request)
}

/// Case-insensitive substring match on name or email. Blank terms match all.
pub fn matches_search(candidate: &Candidate, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    candidate.name.to_lowercase().contains(&term) || candidate.email.to_lowercase().contains(&term)
}

pub fn filter_candidates(rows: &[Candidate], search: Option<&str>) -> Vec<Candidate> {
    match search {
        Some(term) => rows
            .iter()
            .filter(|c| matches_search(c, term))
            .cloned()
            .collect(),
        None => rows.to_vec(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Lane {
    pub status: CandidateStatus,
    pub title: &'static str,
    /// Filtered count for the whole lane, not just this page.
    pub count: usize,
    pub cards: Page<Candidate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub total: usize,
    pub lanes: Vec<Lane>,
}

fn lane_title(status: CandidateStatus) -> &'static str {
    match status {
        CandidateStatus::InProgress => "In Progress",
        CandidateStatus::Hired => "Hired",
        CandidateStatus::Rejected => "Rejected",
        CandidateStatus::Completed => "Completed",
    }
}

/// Groups candidates into pipeline lanes. The three current lanes are always
/// present; a `completed` lane appears only when legacy rows exist.
pub fn build_board(rows: &[Candidate], search: Option<&str>, request: PageRequest) -> Board {
    let filtered = filter_candidates(rows, search);

    let mut statuses = vec![
        CandidateStatus::InProgress,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
    ];
    if filtered.iter().any(|c| c.status == CandidateStatus::Completed) {
        statuses.push(CandidateStatus::Completed);
    }

    let lanes = statuses
        .into_iter()
        .map(|status| {
            let in_lane: Vec<Candidate> = filtered
                .iter()
                .filter(|c| c.status == status)
                .cloned()
                .collect();
            Lane {
                status,
                title: lane_title(status),
                count: in_lane.len(),
                cards: paginate(&in_lane, request),
            }
        })
        .collect();

    Board {
        total: filtered.len(),
        lanes,
    }
}
