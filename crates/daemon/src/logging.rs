// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup

use crate::config::Config;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name inside `--log-dir`
pub const LOG_FILE: &str = "rbd.log";

/// Default filter directive when `RUST_LOG` is unset
pub fn default_directive(config: &Config) -> &'static str {
    if config.debug {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber.
///
/// Logs go to stderr unless a log directory is configured. The returned
/// guard flushes the file writer and must live until shutdown.
pub fn setup_logging(config: &Config) -> std::io::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    match &config.log_dir {
        Some(dir) => {
            let (writer, guard) = file_writer(dir)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}

fn file_writer(
    dir: &Path,
) -> std::io::Result<(tracing_appender::non_blocking::NonBlocking, WorkerGuard)> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn debug_flag_raises_default_level() {
        let quiet = Config::try_parse_from(["rbd", "--debug", "false"]).unwrap();
        let loud = Config::try_parse_from(["rbd", "--debug"]).unwrap();

        assert_eq!(default_directive(&quiet), "info");
        assert_eq!(default_directive(&loud), "debug");
    }

    #[test]
    fn file_writer_creates_log_directory() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("nested").join("logs");

        let (_writer, guard) = file_writer(&dir).unwrap();
        drop(guard);

        assert!(dir.is_dir());
    }
}
