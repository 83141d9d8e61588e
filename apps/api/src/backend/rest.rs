//! Table access over the backend's PostgREST-style API.
//!
//! Filters are `column=eq.value` query pairs, ordering is `order=col.dir`,
//! and row ranges travel in the `Range` header. Writes ask for
//! `return=representation` so the stored rows come back in the response.

use std::fmt::Display;

use reqwest::{header::CONTENT_RANGE, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{check, BackendClient, BackendError};

const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// Inclusive row range, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub from: usize,
    pub to: usize,
}

impl RowRange {
    pub fn header_value(&self) -> String {
        format!("{}-{}", self.from, self.to)
    }
}

/// Row selection: equality filters, one ordering, optional range.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<(String, String)>,
    order: Option<(String, Direction)>,
    range: Option<RowRange>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some((column.to_string(), direction));
        self
    }

    pub fn range(mut self, range: RowRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        pairs.extend(self.filters.iter().cloned());
        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{column}.{}", direction.as_str())));
        }
        pairs
    }
}

/// Total from a `Content-Range` value such as `0-19/57` or `*/0`.
/// `None` when the server did not count (`0-19/*`).
fn parse_content_range(value: &str) -> Option<usize> {
    let (_, total) = value.trim().rsplit_once('/')?;
    total.parse().ok()
}

impl BackendClient {
    fn select_request(&self, access_token: &str, table: &str, query: &Query) -> RequestBuilder {
        let request = self
            .authorize(self.client.get(self.rest_url(table)), Some(access_token))
            .query(&query.query_pairs());
        match query.range {
            Some(range) => request
                .header("Range-Unit", "items")
                .header("Range", range.header_value()),
            None => request,
        }
    }

    /// `GET /rest/v1/<table>?select=*&...`
    pub async fn select<T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let request = self.select_request(access_token, table, query);

        debug!("select from {table}");
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Like [`select`](Self::select) but also asks for the exact row count,
    /// read back from `Content-Range: <from>-<to>/<total>`. A range past the
    /// last row answers 416, which is an empty page rather than an error.
    pub async fn select_counted<T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        query: &Query,
    ) -> Result<(Vec<T>, Option<usize>), BackendError> {
        let request = self
            .select_request(access_token, table, query)
            .header("Prefer", COUNT_EXACT);

        debug!("counted select from {table}");
        let response = request.send().await?;
        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Ok((Vec::new(), total));
        }
        let response = check(response).await?;
        Ok((response.json().await?, total))
    }

    /// `POST /rest/v1/<table>` with a single-row array body. Returns the stored row.
    pub async fn insert<B: Serialize, T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        row: &B,
    ) -> Result<T, BackendError> {
        let request = self
            .authorize(self.client.post(self.rest_url(table)), Some(access_token))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&[row]);

        debug!("insert into {table}");
        let response = check(request.send().await?).await?;
        let mut rows: Vec<T> = response.json().await?;
        if rows.is_empty() {
            return Err(BackendError::EmptyRepresentation);
        }
        Ok(rows.swap_remove(0))
    }

    /// `PATCH /rest/v1/<table>?...`. Returns the updated rows; empty when nothing matched.
    pub async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        query: &Query,
        patch: &B,
    ) -> Result<Vec<T>, BackendError> {
        let request = self
            .authorize(self.client.patch(self.rest_url(table)), Some(access_token))
            .query(&query.query_pairs())
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);

        debug!("update {table}");
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /rest/v1/<table>?...`. Returns the deleted rows.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        access_token: &str,
        table: &str,
        query: &Query,
    ) -> Result<Vec<T>, BackendError> {
        let request = self
            .authorize(self.client.delete(self.rest_url(table)), Some(access_token))
            .query(&query.query_pairs())
            .header("Prefer", RETURN_REPRESENTATION);

        debug!("delete from {table}");
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }
}
