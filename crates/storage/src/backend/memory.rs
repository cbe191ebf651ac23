// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process backend for tests and non-persistent deployments

use super::{Backend, BackendError};
use crate::codec::ResourceMap;
use async_trait::async_trait;
use rb_core::Reservation;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemoryState {
    resources: ResourceMap,
    reservations: Vec<Reservation>,
}

/// Backend holding both collections directly in memory.
///
/// Clones share the same state. Nothing survives a restart.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn resources(&self) -> Result<ResourceMap, BackendError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.resources.clone())
    }

    async fn set_resources(&self, resources: &ResourceMap) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.resources = resources.clone();
        Ok(())
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, BackendError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.reservations.clone())
    }

    async fn set_reservations(&self, reservations: &[Reservation]) -> Result<(), BackendError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.reservations = reservations.to_vec();
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
