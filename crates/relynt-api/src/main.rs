//! Relynt API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p relynt-api
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use relynt_common::{try_init_tracing_with_config, AppConfig, Environment, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let tracing_config = TracingConfig::for_environment(Environment::from_env());

    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    info!("Starting Relynt API Server...");

    let config = AppConfig::from_env().inspect_err(|e| {
        error!(error = %e, "Failed to load configuration");
    })?;

    info!(
        env = ?config.app.env,
        port = config.api.port,
        store = ?config.store.backend,
        "Configuration loaded"
    );

    relynt_api::run(config).await?;

    Ok(())
}
