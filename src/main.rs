use clap::Parser;
use discussions_proxy::{api, config::Config, state::AppState};
use std::path::PathBuf;
use tracing::{info, info_span, warn};
use tracing_subscriber::EnvFilter;

/// Discussions proxy — serves a cached, category-filtered view of a
/// repository's GitHub Discussions as JSON.
#[derive(Parser, Debug)]
#[command(name = "discussions-proxy", version, about)]
struct Cli {
    /// Path to a TOML config file (defaults to .discussions-proxy.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config file (e.g., 0.0.0.0:8080)
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    let _main_span = info_span!(
        "serve",
        owner = %config.github.owner,
        repo = %config.github.repo,
        category = %config.github.category_slug,
    )
    .entered();

    let state = AppState::from_config(&config);
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "serving discussions");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
