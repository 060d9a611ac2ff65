mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use tutor_server::{build_router, AppState, InvocationEvent, QaHandler};

use crate::cli::{Cli, Command};

fn load_config() -> tutor_core::Config {
    tutor_core::config::load_dotenv();
    tutor_core::Config::from_env()
}

async fn serve(config: &tutor_core::Config, handler: QaHandler) -> anyhow::Result<()> {
    let state = Arc::new(AppState { handler });
    let app = build_router(state, config.server.max_body_mb * 1024 * 1024);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn invoke(handler: QaHandler, event_path: &Path) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(event_path)
        .await
        .with_context(|| format!("reading event file {}", event_path.display()))?;
    let event: InvocationEvent =
        serde_json::from_str(&raw).context("event file is not a valid invocation event")?;

    let response = handler.handle(event).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `invoke` output stays clean JSON on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config();
    config.log_summary();

    let handler = QaHandler::from_config(&config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, handler).await,
        Command::Invoke { event } => invoke(handler, &event).await,
    }
}
