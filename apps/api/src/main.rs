mod config;
mod entries;
mod errors;
mod export;
mod models;
mod preview;
mod routes;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{DocumentExporter, ExportBridge, HttpDocumentExporter, UnavailableExporter};
use crate::routes::build_router;
use crate::session::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Builder API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize export collaborator
    let exporter: Arc<dyn DocumentExporter> = match &config.export_service_url {
        Some(url) => {
            info!("Export service configured at {url}");
            Arc::new(HttpDocumentExporter::new(url.clone(), config.export_timeout)?)
        }
        None => {
            warn!("EXPORT_SERVICE_URL not set, PDF export will report the service as unavailable");
            Arc::new(UnavailableExporter)
        }
    };

    // Sessions live in memory; a background sweep drops idle ones
    let sessions = Arc::new(SessionRegistry::new(config.session_idle_timeout));
    tokio::spawn(sessions.clone().run_sweeper(config.session_sweep_interval()));

    // Build app state
    let state = AppState {
        sessions,
        exporter: ExportBridge::new(exporter),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the form's origin once it is deployed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
