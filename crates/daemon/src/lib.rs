// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rb-daemon: process shell around the reservation store
//!
//! Front ends embed this crate to obtain a configured `DaemonStore`; the
//! `rbd` binary runs it standalone with the prune sweep.

pub mod config;
pub mod lifecycle;
pub mod logging;
pub mod prune;

pub use config::{Config, ConfigError};
pub use lifecycle::{build, startup, Daemon, DaemonError, DaemonStore, StoreBackend};
pub use logging::setup_logging;
pub use prune::PruneTask;
