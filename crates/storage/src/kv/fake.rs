// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake key-value client for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{KvClient, KvError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Recorded key-value call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvCall {
    Get { key: String },
    Set { key: String, value: String },
}

/// In-memory key-value client with failure injection.
///
/// Every call yields to the scheduler first, so unsynchronized
/// read-modify-write sequences interleave under a multi-threaded runtime.
#[derive(Clone, Default)]
pub struct FakeKvClient {
    values: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<KvCall>>>,
    drop_writes: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

impl FakeKvClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<KvCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Read a stored value without recording a call
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Store a value without recording a call
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    /// Accept writes but never store them
    pub fn set_drop_writes(&self, enabled: bool) {
        self.drop_writes.store(enabled, Ordering::SeqCst);
    }

    /// Fail every call as if the server were unreachable
    pub fn set_unavailable(&self, enabled: bool) {
        self.unavailable.store(enabled, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), KvError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(KvError::Unavailable("fake store is down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl KvClient for FakeKvClient {
    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        tokio::task::yield_now().await;
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(KvCall::Get {
                key: key.to_string(),
            });
        self.check_available()?;

        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        tokio::task::yield_now().await;
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(KvCall::Set {
                key: key.to_string(),
                value: value.to_string(),
            });
        self.check_available()?;

        if !self.drop_writes.load(Ordering::SeqCst) {
            self.insert_raw(key, value);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
