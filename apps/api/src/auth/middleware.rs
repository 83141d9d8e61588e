use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::backend::BackendError;
use crate::errors::AppError;
use crate::models::user::Session;
use crate::state::AppState;

/// Resolves `Authorization: Bearer <token>` to a `Session` extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(request.headers()) else {
        tracing::warn!("token missing, authentication denied");
        return Err(AppError::Unauthorized);
    };

    let user = match state.auth.user_for_token(&token).await {
        Ok(user) => user,
        Err(BackendError::Unauthorized) => {
            tracing::warn!("token rejected by auth provider");
            return Err(AppError::Unauthorized);
        }
        Err(e) => return Err(e.into()),
    };

    request.extensions_mut().insert(Arc::new(Session {
        user,
        access_token: token,
    }));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
