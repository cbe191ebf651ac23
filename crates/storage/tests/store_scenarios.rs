// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end queue scenarios through the public store API
//!
//! These drive a `ReservationStore` the way a chat front end would: a few
//! users contend for shared resources across environments, and the test
//! checks what each of them would be told.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use chrono::{Duration, TimeZone, Utc};
use rb_core::{Clock, FakeClock, User};
use rb_storage::{MemoryBackend, ReservationStore, StoreError, TracedBackend};

type Store = ReservationStore<TracedBackend<MemoryBackend>, FakeClock>;

fn setup() -> (Store, FakeClock) {
    let clock = FakeClock::at(Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());
    let backend = TracedBackend::new(MemoryBackend::new());
    let store = ReservationStore::with_clock(backend, clock.clone());
    (store, clock)
}

#[tokio::test]
async fn handoff_through_a_queue_of_three() {
    let (store, clock) = setup();
    let alice = User::new("U1", "alice");
    let bob = User::new("U2", "bob");
    let carol = User::new("U3", "carol");

    for user in [&alice, &bob, &carol] {
        store.reserve(user, "db1", "prod").await.unwrap();
        clock.advance(Duration::minutes(1));
    }
    assert_eq!(store.get_position(&carol, "db1", "prod").await.unwrap(), 2);

    // Alice finishes; bob takes over and carol moves up
    clock.advance(Duration::minutes(20));
    let removal = store.remove(&alice, "db1", "prod").await.unwrap();
    let bob_took_over = clock.now();
    assert_eq!(removal.promoted.as_ref().map(|res| res.time), Some(bob_took_over));
    assert_eq!(store.get_position(&bob, "db1", "prod").await.unwrap(), 0);
    assert_eq!(store.get_position(&carol, "db1", "prod").await.unwrap(), 1);

    // Carol gives up while waiting; bob's hold time is unchanged
    clock.advance(Duration::minutes(5));
    let removal = store.remove(&carol, "db1", "prod").await.unwrap();
    assert_eq!(removal.promoted, None);
    let holder = store
        .get_reservation_for_resource("db1", "prod")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(holder.user, bob);
    assert_eq!(holder.time, bob_took_over);

    let err = store.get_position(&alice, "db1", "prod").await.unwrap_err();
    assert!(matches!(err, StoreError::NotInQueue { .. }));
}

#[tokio::test]
async fn tearing_down_an_environment() {
    let (store, _) = setup();
    let alice = User::new("U1", "alice");
    let bob = User::new("U2", "bob");

    store.reserve(&alice, "db1", "staging").await.unwrap();
    store.reserve(&bob, "db1", "staging").await.unwrap();
    store.reserve(&bob, "web", "staging").await.unwrap();
    store.reserve(&alice, "db1", "prod").await.unwrap();

    assert_eq!(store.remove_env("staging").await.unwrap(), 2);

    assert!(store.get_queues_for_env("staging").await.unwrap().is_empty());
    let prod = store.get_queues_for_env("prod").await.unwrap();
    assert_eq!(prod.len(), 1);
    assert_eq!(
        prod["db1"].holder().map(|res| res.user.clone()),
        Some(alice.clone())
    );
    assert_eq!(store.get_all_users_in_queues().await.unwrap(), vec![alice]);

    let err = store.remove_env("staging").await.unwrap_err();
    assert!(matches!(err, StoreError::EnvDoesNotExist { .. }));
}

#[tokio::test]
async fn idle_resources_are_swept_but_busy_ones_survive() {
    let (store, clock) = setup();
    let alice = User::new("U1", "alice");

    store.create("x", "").await.unwrap();
    store.reserve(&alice, "y", "").await.unwrap();
    clock.advance(Duration::hours(2));

    let pruned = store.prune_inactive_resources(1).await.unwrap();

    assert_eq!(pruned.len(), 1);
    assert_eq!(pruned[0].name, "x");
    let queues = store.get_queues().await.unwrap();
    assert_eq!(queues.len(), 1);
    assert_eq!(queues[0].resource.name, "y");
    assert!(queues[0].has_reservations());
}
