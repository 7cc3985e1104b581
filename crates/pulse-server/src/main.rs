use anyhow::Result;
use pulse_analytics::MarketingAnalytics;
use pulse_storage::SqliteMarketingStore;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use pulse_server::app;
use pulse_server::config::{ServerConfig, DEFAULT_CONFIG_PATH};
use pulse_server::seed;
use pulse_server::state::AppState;

const DEFAULT_SEED_OUTPUT: &str = "analytics/summary_data.json";

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  pulse-server [config.toml]                          Start the HTTP API");
    eprintln!("  pulse-server seed [config.toml] [summary.json]      Replace store contents with a seed document");
    eprintln!("  pulse-server analyze <spend.csv> [summary.json]     Compute the seed document from a spend export");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("pulse=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("seed") => {
            let config_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
            run_seed(config_path, args.get(3).map(String::as_str))
        }
        Some("analyze") => {
            let csv_path = args.get(2).ok_or_else(|| {
                print_usage();
                anyhow::anyhow!("analyze requires a <spend.csv> argument")
            })?;
            let out_path = args.get(3).map(String::as_str).unwrap_or(DEFAULT_SEED_OUTPUT);
            run_analyze(csv_path, out_path)
        }
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        _ => {
            let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH);
            run_server(config_path).await
        }
    }
}

fn load_config(config_path: &str) -> Result<ServerConfig> {
    let mut config = ServerConfig::load_or_default(config_path)?;
    config.apply_env_overrides();
    Ok(config)
}

/// Clear and repopulate every table from the seed document.
fn run_seed(config_path: &str, seed_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let seed_path = seed_path.unwrap_or(config.seed_path.as_str());
    let store = SqliteMarketingStore::open(Path::new(&config.database_path))?;
    seed::run_seed(&store, Path::new(seed_path))?;
    Ok(())
}

/// Roll up a raw spend export into the seed document.
fn run_analyze(csv_path: &str, out_path: &str) -> Result<()> {
    let analytics = MarketingAnalytics::from_path(Path::new(csv_path))
        .map_err(|e| anyhow::anyhow!("Failed to analyze '{}': {}", csv_path, e))?;
    let doc = analytics.build_document();
    pulse_analytics::export_summary(&doc, Path::new(out_path))?;
    Ok(())
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        database = %config.database_path,
        "pulse-server starting"
    );

    let store = Arc::new(SqliteMarketingStore::open(Path::new(&config.database_path))?);
    let http_addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    let state = AppState::new(store, config);

    let app = app::build_http_app(state);
    let listener = tokio::net::TcpListener::bind(http_addr).await?;

    tracing::info!(http = %http_addr, "Server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            signal::ctrl_c().await.ok();
            tracing::info!("Shutting down gracefully");
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
