//! Nutribot REST API entry point.
//!
//! Binary name: `nutribot`
//!
//! Parses CLI arguments, initializes the database and chat service, then
//! serves the REST API until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use nutribot_api::http;
use nutribot_api::state::AppState;
use nutribot_core::chat::prompt::DEFAULT_TRIGGER_KEYWORD;
use nutribot_infra::llm::gemini::DEFAULT_MODEL;

#[derive(Parser)]
#[command(name = "nutribot", version, about = "Nutrition chatbot REST API")]
struct Cli {
    /// Host to bind the server to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to bind the server to
    #[arg(long, default_value_t = 5000)]
    port: u16,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    gemini_api_key: String,

    /// Gemini model identifier
    #[arg(long, env = "NUTRIBOT_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Keyword that switches the prompt to the nutrition intake template
    #[arg(long, default_value = DEFAULT_TRIGGER_KEYWORD)]
    trigger_keyword: String,

    /// Data directory (defaults to ~/.nutribot)
    #[arg(long, env = "NUTRIBOT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,nutribot=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let state = AppState::init(
        SecretString::from(cli.gemini_api_key),
        cli.model,
        &cli.trigger_keyword,
        cli.data_dir,
    )
    .await?;

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Nutribot API listening on http://{addr}");

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
