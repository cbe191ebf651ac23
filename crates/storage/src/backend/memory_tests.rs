// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use rb_core::{Resource, User};

#[tokio::test]
async fn memory_backend_starts_empty() {
    let backend = MemoryBackend::new();

    assert!(backend.resources().await.unwrap().is_empty());
    assert!(backend.reservations().await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_backend_replaces_whole_collections() {
    let backend = MemoryBackend::new();
    let resource = Resource::new("db1", "prod");

    let mut resources = ResourceMap::new();
    resources.insert(resource.key(), resource.clone());
    backend.set_resources(&resources).await.unwrap();

    let res = Reservation::new(User::new("U1", "alice"), resource, Utc::now());
    backend.set_reservations(&[res.clone()]).await.unwrap();

    assert_eq!(backend.resources().await.unwrap(), resources);
    assert_eq!(backend.reservations().await.unwrap(), vec![res]);

    backend.set_reservations(&[]).await.unwrap();
    assert!(backend.reservations().await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_backend_reads_are_copies() {
    let backend = MemoryBackend::new();

    let mut resources = backend.resources().await.unwrap();
    resources.insert("db1".to_string(), Resource::new("db1", ""));

    assert!(backend.resources().await.unwrap().is_empty());
}

#[tokio::test]
async fn memory_backend_clones_share_state() {
    let backend = MemoryBackend::new();
    let other = backend.clone();

    let mut resources = ResourceMap::new();
    resources.insert("db1".to_string(), Resource::new("db1", ""));
    other.set_resources(&resources).await.unwrap();

    assert_eq!(backend.resources().await.unwrap().len(), 1);
}
