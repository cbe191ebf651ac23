// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: backend selection and startup

use crate::config::{Config, ConfigError};
use crate::prune::PruneTask;
use async_trait::async_trait;
use rb_core::{Reservation, SystemClock};
use rb_storage::{
    Backend, BackendError, DocumentBackend, KvError, MemoryBackend, RedisKvClient,
    ReservationStore, ResourceMap, TracedBackend,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that stop the daemon
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("cannot connect to redis at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: KvError,
    },
    #[error("backend check failed: {0}")]
    Backend(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The backend variant chosen at startup
#[derive(Clone)]
pub enum StoreBackend {
    Memory(MemoryBackend),
    Redis(DocumentBackend<RedisKvClient>),
}

impl StoreBackend {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreBackend::Memory(_) => "memory",
            StoreBackend::Redis(_) => "redis",
        }
    }
}

#[async_trait]
impl Backend for StoreBackend {
    async fn resources(&self) -> Result<ResourceMap, BackendError> {
        match self {
            StoreBackend::Memory(b) => b.resources().await,
            StoreBackend::Redis(b) => b.resources().await,
        }
    }

    async fn set_resources(&self, resources: &ResourceMap) -> Result<(), BackendError> {
        match self {
            StoreBackend::Memory(b) => b.set_resources(resources).await,
            StoreBackend::Redis(b) => b.set_resources(resources).await,
        }
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, BackendError> {
        match self {
            StoreBackend::Memory(b) => b.reservations().await,
            StoreBackend::Redis(b) => b.reservations().await,
        }
    }

    async fn set_reservations(&self, reservations: &[Reservation]) -> Result<(), BackendError> {
        match self {
            StoreBackend::Memory(b) => b.set_reservations(reservations).await,
            StoreBackend::Redis(b) => b.set_reservations(reservations).await,
        }
    }
}

/// Store with the concrete backend used by the daemon (wrapped with tracing)
pub type DaemonStore = ReservationStore<TracedBackend<StoreBackend>, SystemClock>;

/// Running daemon state
pub struct Daemon {
    pub store: Arc<DaemonStore>,
    /// `None` when pruning is disabled
    pub prune: Option<PruneTask<TracedBackend<StoreBackend>, SystemClock>>,
}

/// Validate the configuration, connect the backend and build the store.
///
/// With redis, both documents are read once so a corrupt or unreachable
/// store fails startup instead of the first request.
pub async fn startup(config: &Config) -> Result<Daemon, DaemonError> {
    config.validate()?;

    let backend = if config.use_redis {
        let kv = RedisKvClient::connect(&config.redis_url())
            .await
            .map_err(|source| DaemonError::Connect {
                address: config.redis_address.clone(),
                source,
            })?;
        info!(
            address = %config.redis_address,
            database = config.redis_database,
            "connected to redis"
        );
        StoreBackend::Redis(DocumentBackend::new(kv))
    } else {
        StoreBackend::Memory(MemoryBackend::new())
    };
    Ok(build(config, backend).await?)
}

/// Assemble the daemon around an already connected backend
pub async fn build(config: &Config, backend: StoreBackend) -> Result<Daemon, BackendError> {
    let kind = backend.kind();
    let traced = TracedBackend::new(backend);
    traced.resources().await?;
    traced.reservations().await?;

    let store = Arc::new(ReservationStore::new(traced));
    let prune = config.prune_enabled.then(|| {
        PruneTask::new(
            Arc::clone(&store),
            config.prune_period(),
            config.prune_expire,
        )
    });

    info!(
        backend = kind,
        prune_enabled = config.prune_enabled,
        prune_interval_hours = config.prune_interval,
        prune_expire_hours = config.prune_expire,
        "store ready"
    );
    Ok(Daemon { store, prune })
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
