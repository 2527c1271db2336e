use clap::Parser;
use tracing_subscriber::EnvFilter;

use focus_push::{app, config, AppState};

#[derive(Parser)]
#[command(name = "focus-push")]
#[command(about = "Focus check push notification service")]
#[command(version)]
struct Cli {
    #[arg(long, env = "FOCUS_PUSH_BIND", help = "Address to bind")]
    bind: Option<String>,

    #[arg(long, env = "FOCUS_PUSH_PORT", help = "Port to listen on (falls back to PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Report missing secrets and exit")]
    check_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SUPABASE_URL, FIREBASE_SERVICE_ACCOUNT_JSON, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting focus-push in {:?} mode", config.environment);

    let missing = config.missing_secrets();
    if cli.check_config {
        if missing.is_empty() {
            println!("All required secrets are configured");
            return Ok(());
        }
        for err in &missing {
            eprintln!("{}", err);
        }
        std::process::exit(1);
    }
    for err in &missing {
        tracing::warn!("{} (requests needing it will fail)", err);
    }

    let bind = cli.bind.unwrap_or_else(|| config.server.bind.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", bind, port);

    let state = AppState::new(config.clone())?;
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("focus-push listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
