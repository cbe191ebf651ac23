// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process configuration from flags and environment variables
//!
//! Every flag falls back to an environment variable, so the daemon can be
//! configured entirely from a container environment.

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Longest honored prune interval: one year
pub const MAX_PRUNE_INTERVAL_HOURS: u64 = 24 * 365;

/// Errors from configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("prune interval must be at least one hour")]
    ZeroPruneInterval,
    #[error("redis address is required when redis is enabled")]
    MissingRedisAddress,
}

/// Daemon configuration
#[derive(Parser, Clone, PartialEq, Eq)]
#[command(
    name = "rbd",
    version,
    about = "Reservation store daemon - queued exclusive access to shared resources"
)]
pub struct Config {
    /// Enable debug logging
    #[arg(
        long,
        env = "DEBUG",
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    pub debug: bool,

    /// Periodically remove idle resources
    #[arg(
        long,
        env = "PRUNE_ENABLED",
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    pub prune_enabled: bool,

    /// Hours between prune sweeps
    #[arg(long, env = "PRUNE_INTERVAL", default_value_t = 1)]
    pub prune_interval: u64,

    /// Hours of inactivity after which an idle resource is pruned
    #[arg(long, env = "PRUNE_EXPIRE", default_value_t = 168)]
    pub prune_expire: u64,

    /// Persist state in redis instead of process memory
    #[arg(
        long,
        env = "USE_REDIS",
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
    )]
    pub use_redis: bool,

    /// Redis host and port
    #[arg(long, env = "REDIS_ADDRESS", default_value = "localhost:6379")]
    pub redis_address: String,

    /// Redis password
    #[arg(
        long = "redis-pw",
        env = "REDIS_PASS",
        default_value = "",
        hide_env_values = true
    )]
    pub redis_password: String,

    /// Redis database number
    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    pub redis_database: i64,

    /// Write logs to a file in this directory instead of stderr
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prune_enabled && self.prune_interval == 0 {
            return Err(ConfigError::ZeroPruneInterval);
        }
        if self.use_redis && self.redis_address.trim().is_empty() {
            return Err(ConfigError::MissingRedisAddress);
        }
        Ok(())
    }

    /// Connection URL for the redis client, password included
    pub fn redis_url(&self) -> String {
        let address = self.redis_address.trim();
        if self.redis_password.is_empty() {
            format!("redis://{}/{}", address, self.redis_database)
        } else {
            format!(
                "redis://:{}@{}/{}",
                self.redis_password, address, self.redis_database
            )
        }
    }

    /// Time between prune sweeps, capped so timer arithmetic cannot overflow
    pub fn prune_period(&self) -> Duration {
        let hours = self.prune_interval.min(MAX_PRUNE_INTERVAL_HOURS);
        Duration::from_secs(hours * 3600)
    }
}

// The password must never reach the logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let password = if self.redis_password.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("Config")
            .field("debug", &self.debug)
            .field("prune_enabled", &self.prune_enabled)
            .field("prune_interval", &self.prune_interval)
            .field("prune_expire", &self.prune_expire)
            .field("use_redis", &self.use_redis)
            .field("redis_address", &self.redis_address)
            .field("redis_password", &password)
            .field("redis_database", &self.redis_database)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
