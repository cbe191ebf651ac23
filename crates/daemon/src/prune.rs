// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic sweep of idle resources

use rb_core::Clock;
use rb_storage::{Backend, ReservationStore, StoreError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Runs `prune_inactive_resources` on a fixed period
pub struct PruneTask<B, C> {
    store: Arc<ReservationStore<B, C>>,
    period: Duration,
    max_age_hours: u64,
}

impl<B: Backend, C: Clock> PruneTask<B, C> {
    pub fn new(store: Arc<ReservationStore<B, C>>, period: Duration, max_age_hours: u64) -> Self {
        Self {
            store,
            period,
            max_age_hours,
        }
    }

    /// One sweep. Returns the number of resources removed.
    pub async fn sweep(&self) -> Result<usize, StoreError> {
        let pruned = self
            .store
            .prune_inactive_resources(self.max_age_hours)
            .await?;
        for resource in &pruned {
            tracing::info!(resource = %resource, "pruned idle resource");
        }
        Ok(pruned.len())
    }

    /// Sweep forever. The first sweep happens one period after the call.
    pub async fn run(self) {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            period_secs = self.period.as_secs(),
            max_age_hours = self.max_age_hours,
            "prune task started"
        );
        loop {
            ticker.tick().await;
            match self.sweep().await {
                Ok(count) => tracing::debug!(count, "prune sweep finished"),
                Err(e) => tracing::error!(error = %e, "prune sweep failed"),
            }
        }
    }
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
