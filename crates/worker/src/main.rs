//! E-Invoice Bridge worker
//!
//! Long-lived service that moves staged ERP documents to the e-invoicing
//! gateway and reconciles their validation status.

mod context;
mod logging;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use einvoice_infra::config;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::context::WorkerContext;

#[derive(Debug, Parser)]
#[command(name = "einvoice-worker", version, about = "Submit staged ERP documents to the e-invoicing gateway")]
struct Cli {
    /// Config file used when EINVOICE_* environment variables are incomplete
    #[arg(long, env = "EINVOICE_CONFIG")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so RUST_LOG and EINVOICE_* from the file are visible below
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.json_logs).context("failed to install tracing subscriber")?;

    match dotenv {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "Could not load .env file"),
    }

    let config = config::load_with_path(cli.config).context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    let ctx = WorkerContext::new(config).context("failed to initialize worker")?;
    let cancel = CancellationToken::new();

    if cli.once {
        let report = ctx.orchestrator.run_cycle(&cancel).await;
        info!(
            submitted = report.documents_submitted(),
            captured = report.documents_captured(),
            errored = report.documents_errored(),
            "Single cycle finished"
        );
        return Ok(());
    }

    tokio::spawn(shutdown_on_signal(cancel.clone()));

    info!(
        version = env!("CARGO_PKG_VERSION"),
        staging = %ctx.db.path().display(),
        "E-invoice bridge started"
    );
    let cycles = ctx.orchestrator.run_until_cancelled(cancel).await;
    info!(cycles, "E-invoice bridge stopped");

    Ok(())
}

/// Cancel `token` on SIGINT, or SIGTERM on unix.
async fn shutdown_on_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }

    token.cancel();
}
