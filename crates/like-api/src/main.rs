//! Like API Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p like-api
//! ```
//!
//! Configuration is loaded from environment variables or a `.env` file.

use like_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first so the log format can follow the environment
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    info!(
        env = ?config.app.env,
        port = config.api.port,
        cache_backend = ?config.cache.backend,
        "Starting Like API Server"
    );

    like_api::run(config).await?;

    Ok(())
}
