use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in recruiter as reported by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A resolved bearer session. Inserted into request extensions by the session gate.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    /// Forwarded to the table API so row-level policies apply to the caller.
    pub access_token: String,
}
