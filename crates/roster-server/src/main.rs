//! # Roster Server
//!
//! Main entry point for the Roster user service.

use roster_config::ConfigLoader;
use roster_core::telemetry::{init_tracing, LogFormat};
use roster_server::{app::run, startup::print_banner};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            init_tracing(None, LogFormat::Pretty);
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(
        Some(&config.observability.log_level),
        LogFormat::from_name(&config.observability.log_format),
    );

    print_banner();
    info!("Starting Roster server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
