use std::sync::Arc;

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Candidate and interview tables. Default: `RestStore` over the hosted backend.
    pub store: Arc<dyn Store>,
    /// Magic-link sign-in and token resolution.
    pub auth: Arc<dyn AuthProvider>,
    pub config: Config,
}
