//! Authentication gate: magic-link sign-in and bearer sessions.
//!
//! Identity lives with the backend's auth service. This module only asks it
//! to send links, resolve tokens and revoke them.

use async_trait::async_trait;

use crate::backend::{BackendClient, BackendError};
use crate::models::user::AuthUser;

pub mod handlers;
pub mod middleware;

/// Carried in `AppState` as `Arc<dyn AuthProvider>`.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError>;

    /// `BackendError::Unauthorized` for unknown or expired tokens.
    async fn user_for_token(&self, access_token: &str) -> Result<AuthUser, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;
}

#[async_trait]
impl AuthProvider for BackendClient {
    async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        BackendClient::send_magic_link(self, email, redirect_to).await
    }

    async fn user_for_token(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        self.get_user(access_token).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        self.logout(access_token).await
    }
}
