use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cashcard_api::config::{self, AppConfig};
use cashcard_api::AppState;

#[derive(Parser)]
#[command(name = "cashcard-api")]
#[command(about = "Cash card REST API with per-owner access control")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Interface to bind (overrides SERVER_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides PORT / CASHCARD_API_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "SQLite connection URL (overrides DATABASE_URL)")]
    database_url: Option<String>,

    #[arg(long, help = "Do not load the demo cash cards into an empty store")]
    no_seed: bool,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = self.database_url {
            config.database.url = url;
        }
        if self.no_seed {
            config.database.seed = false;
        }
        config
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PORT, etc.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(config::config().clone());
    tracing::info!("Starting cash card API in {:?} mode", config.environment);

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialize application")?;
    let database = state.database.clone();
    let app = cashcard_api::router(state, config.security.enable_cors);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Cash card API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
