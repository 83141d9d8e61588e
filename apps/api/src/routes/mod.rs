pub mod health;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::auth::{handlers as auth, middleware::require_session};
use crate::candidates::handlers as candidates;
use crate::interviews::handlers as interviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Everything below needs a signed-in recruiter
    let protected = Router::new()
        .route("/api/v1/auth/me", get(auth::handle_me))
        .route("/api/v1/auth/logout", post(auth::handle_logout))
        .route("/api/v1/dashboard", get(candidates::handle_dashboard))
        // Candidates API
        .route(
            "/api/v1/candidates",
            get(candidates::handle_list_candidates).post(candidates::handle_create_candidate),
        )
        .route(
            "/api/v1/candidates/:id",
            get(candidates::handle_get_candidate)
                .patch(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        // Interviews API
        .route(
            "/api/v1/candidates/:id/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_record_interview),
        )
        .route(
            "/api/v1/candidates/:id/interviews/preview",
            post(interviews::handle_preview_interview),
        )
        .route(
            "/api/v1/candidates/:id/interviews/schedule",
            post(interviews::handle_schedule_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            patch(interviews::handle_update_interview).delete(interviews::handle_delete_interview),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/auth/magic-link", post(auth::handle_magic_link))
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::testing::{send, test_context};

    #[tokio::test]
    async fn health_is_public() {
        let ctx = test_context();
        let (status, body) = send(&ctx, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "careerweek-api");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_token() {
        let ctx = test_context();
        for uri in ["/api/v1/dashboard", "/api/v1/candidates", "/api/v1/auth/me"] {
            let (status, body) = send(&ctx, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"]["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let ctx = test_context();
        let (status, body) = send(&ctx, "GET", "/api/v1/nowhere", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Value::Null);
    }
}
