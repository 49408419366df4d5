//! ClipFlow Queue Dispatch (clipflow-qd) - Main entry point
//!
//! HTTP service coordinating the recorder → editor → uploader handoff chain:
//! queue listings with SLA tiers, exclusive time-boxed claims, automatic
//! dispatch, and validated status transitions.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use clipflow_common::config;
use clipflow_common::db::init_database;
use clipflow_qd::{build_router, AppState};

/// Command-line arguments for clipflow-qd
#[derive(Parser, Debug)]
#[command(name = "clipflow-qd")]
#[command(about = "Queue Dispatch service for ClipFlow")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5730", env = "CLIPFLOW_QD_PORT")]
    port: u16,

    /// Data folder containing clipflow.db
    #[arg(short, long, env = "CLIPFLOW_DATA_FOLDER")]
    data_folder: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clipflow_qd=debug,tower_http=debug".into()),
        )
        .init();

    // Log build identification immediately after tracing init, before any
    // database delays
    info!(
        "Starting ClipFlow Queue Dispatch (clipflow-qd) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let data_folder =
        config::resolve_data_folder(args.data_folder.as_deref(), "CLIPFLOW_DATA_FOLDER")
            .context("Failed to resolve data folder")?;
    config::ensure_data_folder(&data_folder).context("Failed to create data folder")?;

    let db_path = config::database_path(&data_folder);
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
