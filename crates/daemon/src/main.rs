// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation Store Daemon (rbd)
//!
//! Holds the store open and sweeps idle resources until signalled.

use clap::Parser;
use rb_daemon::{setup_logging, startup, Config};
use std::future::Future;
use std::pin::Pin;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    // Held until exit so buffered log lines are flushed
    let _log_guard = setup_logging(&config)?;

    info!(?config, "starting rbd");

    let daemon = match startup(&config).await {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    let prune: Pin<Box<dyn Future<Output = ()>>> = match daemon.prune {
        Some(task) => Box::pin(task.run()),
        None => {
            info!("pruning disabled");
            Box::pin(std::future::pending())
        }
    };

    info!("Daemon ready");

    tokio::select! {
        _ = prune => {}
        _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        _ = sigint.recv() => info!("Received SIGINT, shutting down..."),
    }

    info!("Daemon stopped");
    Ok(())
}
