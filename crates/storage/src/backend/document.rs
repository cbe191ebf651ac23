// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Backend storing serialized documents in a key-value store

use super::{Backend, BackendError};
use crate::codec::{self, Document, ResourceMap};
use crate::kv::KvClient;
use async_trait::async_trait;
use rb_core::Reservation;

/// Backend over any `KvClient`.
///
/// A document that has never been written is initialized to its empty
/// encoding on first read. If it is still absent after that, or cannot be
/// decoded, the read fails instead of guessing.
#[derive(Clone)]
pub struct DocumentBackend<K> {
    kv: K,
}

impl<K: KvClient> DocumentBackend<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    async fn read(&self, document: Document) -> Result<String, BackendError> {
        if let Some(raw) = self.get(document).await? {
            return Ok(raw);
        }

        tracing::info!(%document, "initializing empty document");
        let empty = document.empty().map_err(BackendError::Encode)?;
        self.write(document, &empty).await?;

        match self.get(document).await? {
            Some(raw) => Ok(raw),
            None => {
                tracing::error!(%document, "document missing after initialization");
                Err(BackendError::Uninitialized { document })
            }
        }
    }

    async fn get(&self, document: Document) -> Result<Option<String>, BackendError> {
        self.kv.get(document.key()).await.map_err(|source| {
            tracing::error!(%document, error = %source, "read failed");
            BackendError::Unavailable { document, source }
        })
    }

    async fn write(&self, document: Document, raw: &str) -> Result<(), BackendError> {
        self.kv.set(document.key(), raw).await.map_err(|source| {
            tracing::error!(%document, error = %source, "write failed");
            BackendError::Unavailable { document, source }
        })
    }
}

fn corrupt(err: codec::CodecError) -> BackendError {
    tracing::error!(error = %err, "stored document is corrupt");
    BackendError::Corrupt(err)
}

#[async_trait]
impl<K: KvClient> Backend for DocumentBackend<K> {
    async fn resources(&self) -> Result<ResourceMap, BackendError> {
        let raw = self.read(Document::Resources).await?;
        codec::decode_resources(&raw).map_err(corrupt)
    }

    async fn set_resources(&self, resources: &ResourceMap) -> Result<(), BackendError> {
        let raw = codec::encode_resources(resources).map_err(BackendError::Encode)?;
        self.write(Document::Resources, &raw).await
    }

    async fn reservations(&self) -> Result<Vec<Reservation>, BackendError> {
        let raw = self.read(Document::Reservations).await?;
        codec::decode_reservations(&raw).map_err(corrupt)
    }

    async fn set_reservations(&self, reservations: &[Reservation]) -> Result<(), BackendError> {
        let raw = codec::encode_reservations(reservations).map_err(BackendError::Encode)?;
        self.write(Document::Reservations, &raw).await
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
