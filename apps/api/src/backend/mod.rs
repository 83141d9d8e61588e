/// Backend client, the single point of entry for the hosted backend-as-a-service.
///
/// No other module may issue HTTP requests to the backend directly. Table
/// access lives in `rest`, sign-in and session lookup in `auth`.
///
/// Calls are plain pass-throughs: no retries, no transactions. Whatever the
/// backend answers is what the caller gets.
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub mod auth;
pub mod rest;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend rejected the session")]
    Unauthorized,

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend returned no representation for a write")]
    EmptyRepresentation,
}

/// Error bodies differ between the table API (`message`) and the auth API
/// (`msg` / `error_description`).
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
}

impl BackendErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.msg).or(self.error_description)
    }
}

/// HTTP client for the hosted backend.
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl BackendClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        info!("Backend client initialized for {base_url}");
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    /// Every request carries the project key; user calls add the caller's token.
    fn authorize(&self, request: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
        let request = request.header("apikey", &self.anon_key);
        match access_token {
            Some(token) => request.bearer_auth(token),
            None => request.bearer_auth(&self.anon_key),
        }
    }
}

/// Turns non-2xx responses into `BackendError`.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status.as_u16() == 401 || status.as_u16() == 403 {
        debug!("Backend answered {status}");
        return Err(BackendError::Unauthorized);
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::Api {
        status: status.as_u16(),
        message: parse_error_message(&body),
    })
}

fn parse_error_message(body: &str) -> String {
    serde_json::from_str::<BackendErrorBody>(body)
        .ok()
        .and_then(BackendErrorBody::into_message)
        .unwrap_or_else(|| body.to_string())
}
