use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::models::user::{AuthUser, Session};
use crate::state::AppState;
use crate::validation::validate_email;

#[derive(Debug, Deserialize)]
pub struct MagicLinkRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/v1/auth/magic-link
pub async fn handle_magic_link(
    State(state): State<AppState>,
    Json(req): Json<MagicLinkRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let email = validate_email(&req.email)?;
    state
        .auth
        .send_magic_link(&email, &state.config.site_url)
        .await?;
    info!("Magic link requested");
    Ok(Json(MessageResponse {
        message: "Magic link sent! Check your email.".to_string(),
    }))
}

/// GET /api/v1/auth/me
pub async fn handle_me(Extension(session): Extension<Arc<Session>>) -> Json<AuthUser> {
    Json(session.user.clone())
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
) -> Result<StatusCode, AppError> {
    state.auth.sign_out(&session.access_token).await?;
    info!("User {} signed out", session.user.id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::testing::{send, test_context, TOKEN};

    #[tokio::test]
    async fn magic_link_is_forwarded_with_site_url() {
        let ctx = test_context();
        let (status, body) = send(
            &ctx,
            "POST",
            "/api/v1/auth/magic-link",
            None,
            Some(json!({ "email": " recruiter@careerweek.com " })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Magic link sent! Check your email.");
        assert_eq!(
            ctx.auth.sent_links(),
            vec![(
                "recruiter@careerweek.com".to_string(),
                "http://localhost:5173".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn magic_link_rejects_malformed_email() {
        let ctx = test_context();
        let (status, body) = send(
            &ctx,
            "POST",
            "/api/v1/auth/magic-link",
            None,
            Some(json!({ "email": "not-an-email" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(ctx.auth.sent_links().is_empty());
    }

    #[tokio::test]
    async fn me_requires_a_session() {
        let ctx = test_context();
        let (status, _) = send(&ctx, "GET", "/api/v1/auth/me", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&ctx, "GET", "/api/v1/auth/me", Some("stale-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn me_returns_session_user() {
        let ctx = test_context();
        let (status, body) = send(&ctx, "GET", "/api/v1/auth/me", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "recruiter@careerweek.com");
    }

    #[tokio::test]
    async fn logout_revokes_token() {
        let ctx = test_context();
        let (status, _) = send(&ctx, "POST", "/api/v1/auth/logout", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&ctx, "GET", "/api/v1/auth/me", Some(TOKEN), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
