use std::sync::Arc;

use crate::backend::ResumeBackend;
use crate::config::Config;
use crate::editor::registry::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Résumé storage service. `BackendClient` in production, a fake in tests.
    pub backend: Arc<dyn ResumeBackend>,
    pub sessions: SessionRegistry,
}
