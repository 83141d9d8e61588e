//! Magic-link sign-in and session lookup against the backend's auth API.

use serde::Serialize;
use tracing::debug;

use super::{check, BackendClient, BackendError};
use crate::models::user::AuthUser;

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    create_user: bool,
}

impl BackendClient {
    /// `POST /auth/v1/otp?redirect_to=<url>`: emails a one-time sign-in link.
    pub async fn send_magic_link(&self, email: &str, redirect_to: &str) -> Result<(), BackendError> {
        let request = self
            .authorize(self.client.post(self.auth_url("/otp")), None)
            .query(&[("redirect_to", redirect_to)])
            .json(&OtpRequest {
                email,
                create_user: true,
            });

        debug!("requesting magic link");
        check(request.send().await?).await?;
        Ok(())
    }

    /// `GET /auth/v1/user`: resolves an access token to its user.
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        let request = self.authorize(self.client.get(self.auth_url("/user")), Some(access_token));
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// `POST /auth/v1/logout`: revokes the session behind an access token.
    pub async fn logout(&self, access_token: &str) -> Result<(), BackendError> {
        let request = self.authorize(self.client.post(self.auth_url("/logout")), Some(access_token));
        check(request.send().await?).await?;
        Ok(())
    }
}
