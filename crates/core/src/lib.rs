// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rb-core: entity model for queued resource reservations
//!
//! This crate provides:
//! - `Resource`, `User` and `Reservation` records with derived keys
//! - `Queue`, the per-resource view derived from the reservation sequence
//! - A clock abstraction so timestamps are controllable in tests

pub mod clock;
pub mod queue;
pub mod reservation;
pub mod resource;

pub use clock::{Clock, FakeClock, SystemClock};
pub use queue::Queue;
pub use reservation::{Reservation, User};
pub use resource::{resource_key, Resource};
