pub mod api;
pub mod classifier;
pub mod config;
pub mod models;
pub mod report;

use tracing_subscriber::EnvFilter;

use api::{start_server_on, AppContext, ServerError};
use config::{ReportConfig, ServerConfig};

/// Install the fmt subscriber. `RUST_LOG` wins over the default filter.
/// Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Serve the report form until Ctrl-C.
pub async fn run() -> Result<(), ServerError> {
    init_tracing();

    tracing::info!("ColpoVision starting v{}", config::APP_VERSION);

    let report = ReportConfig::default();
    match report.signature_path() {
        Some(path) => tracing::info!(path = %path.display(), "Signature image found"),
        None => tracing::warn!(
            candidates = ?report.signature_candidates,
            "{} not found yet, reports print the clinician block until it appears",
            config::SIGNATURE_FILENAME
        ),
    }

    let ctx = AppContext::with_placeholder(report);
    let mut server = start_server_on(ctx, &ServerConfig::default()).await?;
    tracing::info!(url = %server.session.url, "Open the form in a browser");

    let signal = tokio::signal::ctrl_c().await;
    server.shutdown();
    server.wait().await;
    signal.map_err(ServerError::Signal)
}
