use anyhow::Context;
use axum::extract::State;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod api;
mod app_env;
mod db;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routes;
mod routing_utils;

/// State shared by every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

type AppState = State<Arc<SharedData>>;

#[derive(Debug, Parser)]
#[command(name = "todo-rest")]
#[command(about = "REST API for managing todos", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending migrations and serve the API (the default)
    Serve,
    /// Roll the database schema back to an earlier migration version, then exit
    RevertMigrations {
        /// Version to keep. Everything applied after it is reverted; 0 reverts all migrations.
        #[arg(long)]
        to: i64,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let dotenv_result = dotenv();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => Some(logging::init_exporters(&span_url, &metric_url)?),
        _ => None,
    };
    let exporting_telemetry = otel_exporters.is_some();
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    if dotenv_result.is_err() {
        warn!("No .env file was loaded, configuration comes from the environment only.");
    }
    if !exporting_telemetry {
        info!("OpenTelemetry export URLs not set, telemetry is only logged to stdout.");
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set", app_env::DB_URL))?;
    let pool = db::connect_sqlx(&db_url).await?;

    if let Some(Command::RevertMigrations { to }) = cli.command {
        db::revert_migrations(&pool, to).await?;
        info!("Database migrations reverted to version {to}.");
        return Ok(());
    }

    db::run_migrations(&pool).await?;
    info!("Database migrations are up to date.");

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(pool),
    });
    let router = routes::build_router(shared_data);

    let listen_addr =
        env::var(app_env::LISTEN_ADDR).unwrap_or_else(|_| app_env::DEFAULT_LISTEN_ADDR.to_owned());
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("binding to {listen_addr}"))?;

    info!("Starting server on {listen_addr}.");
    axum::serve(listener, router)
        .await
        .context("running the HTTP server")?;

    Ok(())
}
