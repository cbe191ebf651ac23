// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for store operations

use crate::backend::BackendError;
use thiserror::Error;

/// Errors returned by `ReservationStore` operations.
///
/// All variants except `Backend` are ordinary negative results the caller
/// reports back to the user. `Backend` means the system itself is broken.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("resource does not exist: {key}")]
    ResourceDoesNotExist { key: String },
    #[error("no resources in environment: {env}")]
    EnvDoesNotExist { env: String },
    #[error("{user} is already in the queue for {key}")]
    AlreadyInQueue { user: String, key: String },
    #[error("{user} is not in the queue for {key}")]
    NotInQueue { user: String, key: String },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StoreError {
    /// Whether the failure comes from the backend rather than the request
    pub fn is_internal(&self) -> bool {
        matches!(self, StoreError::Backend(_))
    }
}
