// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced backend wrapper for consistent observability

use crate::backend::{Backend, BackendError};
use crate::codec::ResourceMap;
use async_trait::async_trait;
use rb_core::Reservation;
use std::time::Instant;
use tracing::Instrument;

/// Wrapper that adds tracing to any Backend
#[derive(Clone)]
pub struct TracedBackend<B> {
    inner: B,
}

impl<B> TracedBackend<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }
}

fn report<T>(result: &Result<T, BackendError>, start: Instant, count: impl Fn(&T) -> usize) {
    let elapsed_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(value) => tracing::debug!(elapsed_ms, count = count(value), "done"),
        Err(e) => tracing::error!(elapsed_ms, error = %e, "failed"),
    }
}

#[async_trait]
impl<B: Backend> Backend for TracedBackend<B> {
    async fn resources(&self) -> Result<ResourceMap, BackendError> {
        async {
            let start = Instant::now();
            let result = self.inner.resources().await;
            report(&result, start, |map| map.len());
            result
        }
        .instrument(tracing::debug_span!("backend.resources"))
        .await
    }

    async fn set_resources(&self, resources: &ResourceMap) -> Result<(), BackendError> {
        async {
            let start = Instant::now();
            let result = self.inner.set_resources(resources).await;
            report(&result, start, |_| resources.len());
            result
        }
        .instrument(tracing::debug_span!("backend.set_resources"))
        .await
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, BackendError> {
        async {
            let start = Instant::now();
            let result = self.inner.reservations().await;
            report(&result, start, |list| list.len());
            result
        }
        .instrument(tracing::debug_span!("backend.reservations"))
        .await
    }

    async fn set_reservations(&self, reservations: &[Reservation]) -> Result<(), BackendError> {
        async {
            let start = Instant::now();
            let result = self.inner.set_reservations(reservations).await;
            report(&result, start, |_| reservations.len());
            result
        }
        .instrument(tracing::debug_span!("backend.set_reservations"))
        .await
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
