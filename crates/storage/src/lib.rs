// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rb-storage: persisted reservation queues
//!
//! This crate provides:
//! - `ReservationStore`, the locked operations over resources and queues
//! - `Backend` with in-memory and key-value document implementations
//! - `KvClient` for Redis, plus a fake for tests

pub mod backend;
pub mod codec;
pub mod error;
pub mod kv;
pub mod store;
pub mod traced;

pub use backend::{Backend, BackendError, DocumentBackend, MemoryBackend};
pub use codec::{CodecError, Document, ResourceMap};
pub use error::StoreError;
pub use kv::{KvClient, KvError, RedisKvClient};
pub use store::{Removal, ReservationStore};
pub use traced::TracedBackend;

#[cfg(any(test, feature = "test-support"))]
pub use kv::{FakeKvClient, KvCall};
