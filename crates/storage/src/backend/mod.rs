// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend contract for the two reservation documents
//!
//! Both variants behave identically apart from durability:
//! - `MemoryBackend` keeps native collections in process memory
//! - `DocumentBackend` serializes them into a shared key-value store

mod document;
mod memory;

pub use document::DocumentBackend;
pub use memory::MemoryBackend;

use crate::codec::{CodecError, Document, ResourceMap};
use crate::kv::KvError;
use async_trait::async_trait;
use rb_core::Reservation;
use thiserror::Error;

/// Errors from backend operations.
///
/// Every variant is fatal for the operation that hit it: the store cannot
/// produce a trustworthy view of its state.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unavailable for {document}: {source}")]
    Unavailable {
        document: Document,
        #[source]
        source: KvError,
    },
    #[error("{document} is still missing after initialization")]
    Uninitialized { document: Document },
    #[error("corrupt document: {0}")]
    Corrupt(#[source] CodecError),
    #[error("cannot encode document: {0}")]
    Encode(#[source] CodecError),
}

/// Storage for the resource mapping and the reservation sequence.
///
/// Reads of a never-written document return the empty collection. Writes
/// replace the whole document.
#[async_trait]
pub trait Backend: Clone + Send + Sync + 'static {
    /// Read the resource mapping
    async fn resources(&self) -> Result<ResourceMap, BackendError>;

    /// Replace the resource mapping
    async fn set_resources(&self, resources: &ResourceMap) -> Result<(), BackendError>;

    /// Read the reservation sequence in storage order
    async fn reservations(&self) -> Result<Vec<Reservation>, BackendError>;

    /// Replace the reservation sequence
    async fn set_reservations(&self, reservations: &[Reservation]) -> Result<(), BackendError>;
}
