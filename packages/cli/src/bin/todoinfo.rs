use clap::Parser;
use tracing_subscriber::EnvFilter;

use todoinfo_cli::config::Config;
use todoinfo_config::RUST_LOG;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env var fallbacks
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(RUST_LOG).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::parse();
    todoinfo_cli::run_server(config).await
}
