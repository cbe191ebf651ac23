// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw key-value clients holding serialized documents

mod remote;

pub use remote::RedisKvClient;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeKvClient, KvCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from key-value operations
#[derive(Debug, Error)]
pub enum KvError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
    #[error("key-value store unavailable: {0}")]
    Unavailable(String),
}

/// Client for a string key-value store.
///
/// `set` overwrites unconditionally; callers provide their own atomicity.
#[async_trait]
pub trait KvClient: Clone + Send + Sync + 'static {
    /// Read a value, `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write a value
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;
}
