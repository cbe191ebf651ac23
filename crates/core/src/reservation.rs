// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Users and their reservations on resources

use crate::resource::Resource;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A requesting user, identified by an opaque ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

/// One user's claim on a resource's queue.
///
/// The full user and resource records are embedded so a stored reservation
/// is self-contained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub user: User,
    pub resource: Resource,
    /// Enqueue time; refreshed when the reservation becomes the holder
    pub time: DateTime<Utc>,
}

impl Reservation {
    pub fn new(user: User, resource: Resource, time: DateTime<Utc>) -> Self {
        Self {
            user,
            resource,
            time,
        }
    }

    /// Whether this reservation belongs to the resource with the given key
    pub fn is_for(&self, key: &str) -> bool {
        self.resource.key() == key
    }

    /// Whether this reservation belongs to the given user
    pub fn is_held_by(&self, user_id: &str) -> bool {
        self.user.id == user_id
    }
}

#[cfg(test)]
#[path = "reservation_tests.rs"]
mod tests;
