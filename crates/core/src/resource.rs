// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resources: named, environment-scoped entities that can be reserved

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Compute the derived key for a resource.
///
/// `"name/env"` when an environment is given, otherwise just `"name"`.
pub fn resource_key(name: &str, env: &str) -> String {
    if env.is_empty() {
        name.to_string()
    } else {
        format!("{name}/{env}")
    }
}

/// A resource for which exclusive access is arbitrated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    #[serde(default)]
    pub env: String,
    /// Last queue-affecting event; `None` until first stamped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
}

impl Resource {
    pub fn new(name: impl Into<String>, env: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            env: env.into(),
            last_activity: None,
        }
    }

    pub fn key(&self) -> String {
        resource_key(&self.name, &self.env)
    }

    /// Record queue activity at `now`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = Some(now);
    }

    /// Whether the last activity happened before `cutoff`.
    ///
    /// A resource that was never stamped counts as inactive.
    pub fn inactive_since(&self, cutoff: DateTime<Utc>) -> bool {
        match self.last_activity {
            Some(at) => at < cutoff,
            None => true,
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
