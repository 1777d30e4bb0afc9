use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{info, warn};

use strategic_report::{
    config::Config,
    create_router,
    extract::extract_path,
    llm::LLM,
    session::InMemorySessionStore,
    utils::init_logger,
    AppState,
};

#[derive(Parser)]
#[command(name = "strategic-report", version, about = "Strategic report service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print the digest and chart for a local file without calling the model
    Extract { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    let _log_guard = init_logger(&config.logging);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Extract { path } => print_digest(&path),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    info!(server = ?config.server, llm = ?config.llm, "Configuration loaded");
    if config.llm.api_key.is_empty() {
        warn!(provider = %config.llm.provider, "No LLM API key configured, /analyze and /chat will fail");
    }

    let llm = LLM::new(&config.llm).map_err(|e| anyhow::anyhow!("Failed to create LLM client: {}", e))?;
    let sessions = Arc::new(InMemorySessionStore::new(config.session.ttl_secs));

    // Create shared state
    let state = AppState::new(config.clone(), llm, sessions);
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

fn print_digest(path: &Path) -> anyhow::Result<()> {
    let digest = extract_path(path)?;
    println!("{}", digest.text);
    if let Some(chart) = &digest.chart {
        println!("{}", serde_json::to_string_pretty(chart)?);
    }
    Ok(())
}
