// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reservation store: locked read-modify-write over the backend
//!
//! The backend has no transactions, and both documents are rewritten whole.
//! Every operation therefore runs inside one store-wide critical section:
//!
//! ```text
//! lock -> read documents -> mutate in memory -> write back -> unlock
//! ```
//!
//! The lock is process-local. Two processes sharing one backend can still
//! clobber each other's writes.

use crate::backend::Backend;
use crate::codec::ResourceMap;
use crate::error::StoreError;
use chrono::{DateTime, Duration, Utc};
use rb_core::{resource_key, Clock, Queue, Reservation, Resource, SystemClock, User};
use std::collections::{BTreeMap, HashSet};
use tokio::sync::Mutex;

/// Outcome of removing a user from a queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub removed: Reservation,
    /// New holder, when the removed reservation was at the head
    pub promoted: Option<Reservation>,
}

/// Queue state for all resources, serialized by a single lock
pub struct ReservationStore<B, C = SystemClock> {
    backend: B,
    clock: C,
    lock: Mutex<()>,
}

impl<B: Backend> ReservationStore<B, SystemClock> {
    pub fn new(backend: B) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<B: Backend, C: Clock> ReservationStore<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self {
            backend,
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Look up a resource, creating and persisting it when `create` is set.
    ///
    /// Returns `None` only when the resource is absent and `create` is false.
    pub async fn get_or_create_resource(
        &self,
        name: &str,
        env: &str,
        create: bool,
    ) -> Result<Option<Resource>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let key = resource_key(name, env);

        if let Some(resource) = resources.get(&key) {
            return Ok(Some(resource.clone()));
        }
        if !create {
            return Ok(None);
        }

        let resource = Resource::new(name, env);
        resources.insert(key.clone(), resource.clone());
        self.backend.set_resources(&resources).await?;
        tracing::info!(resource = %key, "created resource");
        Ok(Some(resource))
    }

    /// Ensure a resource exists and mark it active now
    pub async fn create(&self, name: &str, env: &str) -> Result<Resource, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;

        let resource = ensure(&mut resources, name, env);
        resource.touch(self.clock.now());
        let resource = resource.clone();

        self.backend.set_resources(&resources).await?;
        tracing::info!(resource = %resource, "created resource");
        Ok(resource)
    }

    /// Append the user to the resource's queue, creating the resource if needed
    pub async fn reserve(
        &self,
        user: &User,
        name: &str,
        env: &str,
    ) -> Result<Reservation, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let mut reservations = self.backend.reservations().await?;
        let now = self.clock.now();

        let resource = ensure(&mut resources, name, env);
        let key = resource.key();
        if reservations
            .iter()
            .any(|res| res.is_for(&key) && res.is_held_by(&user.id))
        {
            return Err(StoreError::AlreadyInQueue {
                user: user.to_string(),
                key,
            });
        }

        resource.touch(now);
        let reservation = Reservation::new(user.clone(), resource.clone(), now);
        reservations.push(reservation.clone());

        // Resource first, so a reservation never refers to an unsaved resource
        self.backend.set_resources(&resources).await?;
        self.backend.set_reservations(&reservations).await?;
        tracing::info!(user = %user.id, resource = %key, "reserved");
        Ok(reservation)
    }

    /// The user's reservation on a resource, if any.
    ///
    /// A missing resource is reported as `None`, not as an error.
    pub async fn get_reservation(
        &self,
        user: &User,
        name: &str,
        env: &str,
    ) -> Result<Option<Reservation>, StoreError> {
        let _guard = self.lock.lock().await;
        let resources = self.backend.resources().await?;
        let key = resource_key(name, env);
        if !resources.contains_key(&key) {
            return Ok(None);
        }

        let reservations = self.backend.reservations().await?;
        Ok(reservations
            .into_iter()
            .find(|res| res.is_for(&key) && res.is_held_by(&user.id)))
    }

    /// Remove the user from the resource's queue.
    ///
    /// When the user held the resource, the next reservation in line becomes
    /// the holder and its time is reset to now.
    pub async fn remove(
        &self,
        user: &User,
        name: &str,
        env: &str,
    ) -> Result<Removal, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let key = lookup(&resources, name, env)?.key();
        let mut reservations = self.backend.reservations().await?;

        let found = reservations
            .iter()
            .enumerate()
            .filter(|(_, res)| res.is_for(&key))
            .enumerate()
            .find(|(_, (_, res))| res.is_held_by(&user.id))
            .map(|(position, (index, _))| (position, index));
        let Some((position, index)) = found else {
            return Err(StoreError::NotInQueue {
                user: user.to_string(),
                key,
            });
        };

        let now = self.clock.now();
        let removed = reservations.remove(index);
        let promoted = if position == 0 {
            reservations
                .iter_mut()
                .find(|res| res.is_for(&key))
                .map(|next| {
                    next.time = now;
                    next.clone()
                })
        } else {
            None
        };
        if let Some(resource) = resources.get_mut(&key) {
            resource.touch(now);
        }

        self.backend.set_reservations(&reservations).await?;
        self.backend.set_resources(&resources).await?;
        tracing::info!(
            user = %user.id,
            resource = %key,
            position,
            promoted = promoted.as_ref().map(|res| res.user.id.as_str()),
            "removed from queue"
        );
        Ok(Removal { removed, promoted })
    }

    /// Zero-based position of the user in the resource's queue
    pub async fn get_position(
        &self,
        user: &User,
        name: &str,
        env: &str,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let resources = self.backend.resources().await?;
        let resource = lookup(&resources, name, env)?;
        let reservations = self.backend.reservations().await?;

        let key = resource.key();
        Queue::collect(resource, &reservations)
            .position_of(&user.id)
            .ok_or_else(|| StoreError::NotInQueue {
                user: user.to_string(),
                key,
            })
    }

    /// Delete a resource together with every reservation on it
    pub async fn remove_resource(&self, name: &str, env: &str) -> Result<Resource, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let resource = lookup(&resources, name, env)?;
        let removed = self.delete_resource(&mut resources, &resource).await?;
        tracing::info!(resource = %resource, reservations = removed, "removed resource");
        Ok(resource)
    }

    /// Delete every resource in `env` and every reservation on them.
    ///
    /// Returns the number of resources removed.
    pub async fn remove_env(&self, env: &str) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let mut reservations = self.backend.reservations().await?;

        let resource_count = resources.len();
        resources.retain(|_, resource| resource.env != env);
        let removed_resources = resource_count - resources.len();

        let reservation_count = reservations.len();
        reservations.retain(|res| res.resource.env != env);
        let removed_reservations = reservation_count - reservations.len();

        if removed_resources == 0 && removed_reservations == 0 {
            return Err(StoreError::EnvDoesNotExist {
                env: env.to_string(),
            });
        }

        self.backend.set_reservations(&reservations).await?;
        self.backend.set_resources(&resources).await?;
        tracing::info!(
            env,
            resources = removed_resources,
            reservations = removed_reservations,
            "removed environment"
        );
        Ok(removed_resources)
    }

    /// All resources, ordered by key
    pub async fn get_resources(&self) -> Result<Vec<Resource>, StoreError> {
        let _guard = self.lock.lock().await;
        let resources = self.backend.resources().await?;
        Ok(resources.into_values().collect())
    }

    /// Resources in one environment, ordered by key
    pub async fn get_resources_for_env(&self, env: &str) -> Result<Vec<Resource>, StoreError> {
        let _guard = self.lock.lock().await;
        let resources = self.backend.resources().await?;
        Ok(resources
            .into_values()
            .filter(|resource| resource.env == env)
            .collect())
    }

    /// The resource with its reservations in queue order
    pub async fn get_queue_for_resource(
        &self,
        name: &str,
        env: &str,
    ) -> Result<Queue, StoreError> {
        let _guard = self.lock.lock().await;
        let resources = self.backend.resources().await?;
        let resource = lookup(&resources, name, env)?;
        let reservations = self.backend.reservations().await?;
        Ok(Queue::collect(resource, &reservations))
    }

    /// Queues for every resource, ordered by resource key.
    ///
    /// A resource removed between enumeration and its queue lookup is
    /// skipped. Backend failures still propagate.
    pub async fn get_queues(&self) -> Result<Vec<Queue>, StoreError> {
        let resources = self.get_resources().await?;
        let mut queues = Vec::with_capacity(resources.len());
        for resource in resources {
            if let Some(queue) = self.queue_if_present(&resource).await? {
                queues.push(queue);
            }
        }
        Ok(queues)
    }

    /// Queues for one environment, keyed by resource name
    pub async fn get_queues_for_env(
        &self,
        env: &str,
    ) -> Result<BTreeMap<String, Queue>, StoreError> {
        let resources = self.get_resources_for_env(env).await?;
        let mut queues = BTreeMap::new();
        for resource in resources {
            if let Some(queue) = self.queue_if_present(&resource).await? {
                queues.insert(resource.name.clone(), queue);
            }
        }
        Ok(queues)
    }

    /// The current holder of a resource, `None` when nobody is queued
    pub async fn get_reservation_for_resource(
        &self,
        name: &str,
        env: &str,
    ) -> Result<Option<Reservation>, StoreError> {
        let _guard = self.lock.lock().await;
        let resources = self.backend.resources().await?;
        let key = lookup(&resources, name, env)?.key();
        let reservations = self.backend.reservations().await?;
        Ok(reservations.into_iter().find(|res| res.is_for(&key)))
    }

    /// Every user with at least one reservation, in first-seen order
    pub async fn get_all_users_in_queues(&self) -> Result<Vec<User>, StoreError> {
        let _guard = self.lock.lock().await;
        let reservations = self.backend.reservations().await?;

        let mut seen = HashSet::new();
        Ok(reservations
            .into_iter()
            .map(|res| res.user)
            .filter(|user| seen.insert(user.id.clone()))
            .collect())
    }

    /// Drop every reservation on a resource, keeping the resource.
    ///
    /// Returns the number of reservations removed.
    pub async fn clear_queue_for_resource(
        &self,
        name: &str,
        env: &str,
    ) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let key = lookup(&resources, name, env)?.key();
        let mut reservations = self.backend.reservations().await?;

        let before = reservations.len();
        reservations.retain(|res| !res.is_for(&key));
        let cleared = before - reservations.len();
        if let Some(resource) = resources.get_mut(&key) {
            resource.touch(self.clock.now());
        }

        self.backend.set_reservations(&reservations).await?;
        self.backend.set_resources(&resources).await?;
        tracing::info!(resource = %key, cleared, "cleared queue");
        Ok(cleared)
    }

    /// Remove idle resources whose last activity is older than `max_age_hours`.
    ///
    /// Resources with a non-empty queue are never removed. Failures on one
    /// resource are logged and the sweep moves on. Returns the removed
    /// resources.
    pub async fn prune_inactive_resources(
        &self,
        max_age_hours: u64,
    ) -> Result<Vec<Resource>, StoreError> {
        let resources = self.get_resources().await?;
        let cutoff = prune_cutoff(self.clock.now(), max_age_hours);

        let mut pruned = Vec::new();
        for resource in resources {
            match self.prune_resource(&resource, cutoff).await {
                Ok(Some(removed)) => pruned.push(removed),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(resource = %resource, error = %e, "failed to prune resource");
                }
            }
        }

        if !pruned.is_empty() {
            tracing::info!(count = pruned.len(), max_age_hours, "pruned inactive resources");
        }
        Ok(pruned)
    }

    /// Remove one resource if it is still idle and inactive, checked under the lock
    async fn prune_resource(
        &self,
        resource: &Resource,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<Resource>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut resources = self.backend.resources().await?;
        let Some(current) = resources.get(&resource.key()).cloned() else {
            return Ok(None);
        };

        let reservations = self.backend.reservations().await?;
        let key = current.key();
        if reservations.iter().any(|res| res.is_for(&key)) {
            return Ok(None);
        }
        if !current.inactive_since(cutoff) {
            return Ok(None);
        }

        self.delete_resource(&mut resources, &current).await?;
        tracing::debug!(resource = %key, "pruned resource");
        Ok(Some(current))
    }

    async fn queue_if_present(&self, resource: &Resource) -> Result<Option<Queue>, StoreError> {
        match self
            .get_queue_for_resource(&resource.name, &resource.env)
            .await
        {
            Ok(queue) => Ok(Some(queue)),
            Err(e) if e.is_internal() => Err(e),
            Err(e) => {
                tracing::debug!(resource = %resource, error = %e, "skipping vanished resource");
                Ok(None)
            }
        }
    }

    /// Delete `resource` and its reservations; caller holds the lock
    async fn delete_resource(
        &self,
        resources: &mut ResourceMap,
        resource: &Resource,
    ) -> Result<usize, StoreError> {
        let key = resource.key();
        let mut reservations = self.backend.reservations().await?;
        let before = reservations.len();
        reservations.retain(|res| !res.is_for(&key));
        resources.remove(&key);

        self.backend.set_reservations(&reservations).await?;
        self.backend.set_resources(resources).await?;
        Ok(before - reservations.len())
    }
}

fn lookup(resources: &ResourceMap, name: &str, env: &str) -> Result<Resource, StoreError> {
    let key = resource_key(name, env);
    match resources.get(&key) {
        Some(resource) => Ok(resource.clone()),
        None => Err(StoreError::ResourceDoesNotExist { key }),
    }
}

fn ensure<'a>(resources: &'a mut ResourceMap, name: &str, env: &str) -> &'a mut Resource {
    resources
        .entry(resource_key(name, env))
        .or_insert_with(|| Resource::new(name, env))
}

/// Oldest activity time that survives a prune; saturates instead of overflowing
fn prune_cutoff(now: DateTime<Utc>, max_age_hours: u64) -> DateTime<Utc> {
    i64::try_from(max_age_hours)
        .ok()
        .and_then(Duration::try_hours)
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
