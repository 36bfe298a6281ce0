pub mod config;
pub mod db;
pub mod models;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the hosting application.
///
/// Respects `RUST_LOG` when set, otherwise falls back to the crate default.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("carebook data layer v{}", config::APP_VERSION);
}
