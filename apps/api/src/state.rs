use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportBridge;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    /// Export collaborator. `UnavailableExporter` when no service is configured.
    pub exporter: ExportBridge,
    pub config: Config,
}
