use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ahiska_api::config::AppConfig;
use ahiska_api::database::manager;
use ahiska_api::{app, AppState};

#[derive(Parser)]
#[command(name = "ahiska-api")]
#[command(about = "Ahiska API - community events backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Create the database tables if they do not exist")]
    InitDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ahiska_api=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Ahiska API in {:?} mode", config.environment);

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::InitDb => init_db(config).await,
    }
}

async fn serve(config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let port = port.unwrap_or(config.server.port);
    let pool = manager::connect_lazy(&config.database).context("failed to configure database pool")?;
    let state = AppState::new(config, pool).context("failed to build application state")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Ahiska API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;
    Ok(())
}

async fn init_db(config: AppConfig) -> anyhow::Result<()> {
    let pool = manager::connect(&config.database).await.context("failed to connect to database")?;
    manager::init_schema(&pool).await.context("failed to apply schema")?;
    Ok(())
}
