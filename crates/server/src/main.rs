use clap::Parser;
use kuma_server::config::ServerConfig;
use kuma_server::db::schema;
use kuma_server::scheduler::{self, DueCheck, LocalScheduler, MonitorScheduler};
use kuma_server::web;
use kuma_server::VERSION;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Capacity of the queue between the scheduler and the check executor.
const DUE_CHECK_QUEUE: usize = 1024;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<String>,
}

fn init_logging(log_dir: &str) {
    // Log to a file: JSON format, daily rotation
    let file_appender = rolling::daily(log_dir, "server.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .json();

    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm=warn,sqlx=warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

/// Drains due checks. Running the check itself belongs to the host's
/// executor, so this only records that a check came due.
async fn consume_due_checks(mut due_rx: mpsc::Receiver<DueCheck>) {
    while let Some(due) = due_rx.recv().await {
        debug!(
            monitor_id = due.monitor_id,
            monitor_type = %due.monitor_type,
            target = %due.target,
            "Dispatching due check."
        );
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for the shutdown signal.");
    }
    info!("Shutdown signal received.");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let server_config = ServerConfig::load(args.config.as_deref())?;
    init_logging(&server_config.log_dir);
    info!("Starting server, version: {}", VERSION);

    // --- Database Pool Setup ---
    let mut opt = ConnectOptions::new(server_config.database_url.clone());
    opt.max_connections(server_config.max_db_connections)
        .sqlx_logging(false);
    let db_pool: DatabaseConnection = Database::connect(opt).await.map_err(|e| {
        error!(error = %e, "Failed to create database connection.");
        e
    })?;

    if server_config.ensure_schema {
        schema::ensure_schema(&db_pool).await?;
    }

    // --- Scheduler ---
    let (local_scheduler, due_rx) = LocalScheduler::new(DUE_CHECK_QUEUE);
    tokio::spawn(consume_due_checks(due_rx));
    let monitor_scheduler: Arc<dyn MonitorScheduler> = local_scheduler.clone();
    scheduler::start_active_monitors(&db_pool, monitor_scheduler.as_ref()).await?;

    // --- HTTP Server ---
    let app = web::create_axum_router(db_pool, monitor_scheduler);
    let listener = tokio::net::TcpListener::bind(&server_config.listen_address).await?;
    info!(address = %server_config.listen_address, "HTTP server listening.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(running = local_scheduler.running_count(), "Server stopped.");
    Ok(())
}
