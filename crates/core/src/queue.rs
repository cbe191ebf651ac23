// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Derived per-resource queue view
//!
//! Queues are never persisted. They are rebuilt from the global reservation
//! sequence by filtering on the resource key, so storage order is queue
//! order and the head is the current holder.

use crate::reservation::Reservation;
use crate::resource::Resource;
use serde::Serialize;

/// A resource paired with its reservations in queue order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Queue {
    pub resource: Resource,
    pub reservations: Vec<Reservation>,
}

impl Queue {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            reservations: Vec::new(),
        }
    }

    /// Build the queue for `resource` out of the global reservation sequence
    pub fn collect<'a>(
        resource: Resource,
        reservations: impl IntoIterator<Item = &'a Reservation>,
    ) -> Self {
        let key = resource.key();
        let reservations = reservations
            .into_iter()
            .filter(|res| res.is_for(&key))
            .cloned()
            .collect();
        Self {
            resource,
            reservations,
        }
    }

    /// Whether anyone holds or waits for the resource
    pub fn has_reservations(&self) -> bool {
        !self.reservations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    /// The current holder's reservation
    pub fn holder(&self) -> Option<&Reservation> {
        self.reservations.first()
    }

    /// Zero-based position of the user's reservation
    pub fn position_of(&self, user_id: &str) -> Option<usize> {
        self.reservations
            .iter()
            .position(|res| res.is_held_by(user_id))
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
