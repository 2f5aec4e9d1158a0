//! nexus-sync - Assignment Aggregation Service
//!
//! Aggregates assignment data from LMS upstreams (Canvas, Gradescope) and
//! persists Canvas assignments into a local row store on explicit sync.
//! Serves the HTTP API consumed by the Nexus frontend.

use anyhow::Result;
use clap::Parser;
use nexus_common::config::{ensure_root_folder, resolve_root_folder, TomlConfig};
use nexus_sync::services::canvas_client;
use nexus_sync::services::gradescope_client::GradescopeConfig;
use nexus_sync::{AppState, ServiceConfig};
use std::time::Duration;
use tracing::info;

const USER_AGENT: &str = "Nexus/0.1.0 (https://github.com/nexus-app/nexus)";

#[derive(Debug, Parser)]
#[command(name = "nexus-sync", version, about = "Nexus assignment aggregation service")]
struct Args {
    /// Root folder holding the Nexus database (also NEXUS_ROOT_FOLDER)
    #[arg(long)]
    root_folder: Option<String>,

    /// TCP port to listen on
    #[arg(long, default_value_t = 5174, env = "NEXUS_PORT")]
    port: u16,

    /// Canvas API base URL (normalized on startup)
    #[arg(long, env = "NEXUS_CANVAS_BASE_URL")]
    canvas_base_url: Option<String>,

    /// Gradescope API base URL
    #[arg(long, env = "NEXUS_GRADESCOPE_BASE_URL")]
    gradescope_base_url: Option<String>,

    /// Cap concurrent per-course fetches during aggregation (unbounded when omitted)
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting nexus-sync v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let toml_config = TomlConfig::load_default();

    // Root folder: CLI arg → env → TOML → platform default
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), &toml_config);
    let db_path = ensure_root_folder(&root_folder)?;
    info!("Database: {}", db_path.display());

    let db_pool = nexus_sync::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let config = ServiceConfig {
        canvas_base_url: canvas_client::normalize_base_url(
            args.canvas_base_url
                .as_deref()
                .or(toml_config.canvas_base_url.as_deref())
                .unwrap_or(""),
        ),
        gradescope_base_url: GradescopeConfig::with_base_url(
            args.gradescope_base_url
                .as_deref()
                .or(toml_config.gradescope_base_url.as_deref())
                .unwrap_or(""),
        )
        .base_url,
        concurrency: args.concurrency,
    };
    info!("Canvas base URL: {}", config.canvas_base_url);

    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()?;

    let state = AppState::new(db_pool, http, config);
    let app = nexus_sync::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
