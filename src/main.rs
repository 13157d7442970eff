// src/main.rs

use color_eyre::eyre::{Result, WrapErr};
use std::sync::Arc;
use tracing::info;

use recon_analyst::config::AppConfig;
use recon_analyst::core::pipeline::Pipeline;
use recon_analyst::{api, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Setup ---
    color_eyre::install()?;
    let log_path = logging::initialize_logging(logging::LogOutput::FileAndStderr)?;
    info!(log_file = %log_path.display(), "Logging initialized.");

    let config = AppConfig::from_env()?;
    let pipeline = Arc::new(Pipeline::from_config(&config)?);
    let app = api::router(pipeline, &config.cors_origins);

    // --- Serve ---
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .wrap_err_with(|| format!("could not bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for Ctrl-C, running until killed.");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
