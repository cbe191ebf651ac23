// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;

fn fixed() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

#[test]
fn system_clock_does_not_go_backwards() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 >= t1);
}

#[test]
fn fake_clock_is_frozen_until_advanced() {
    let clock = FakeClock::at(fixed());
    assert_eq!(clock.now(), fixed());
    assert_eq!(clock.now(), fixed());

    clock.advance(Duration::minutes(5));
    assert_eq!(clock.now(), fixed() + Duration::minutes(5));
}

#[test]
fn fake_clock_can_be_set() {
    let clock = FakeClock::new();
    clock.set(fixed());
    assert_eq!(clock.now(), fixed());
}

#[test]
fn fake_clock_is_cloneable_and_shared() {
    let clock1 = FakeClock::at(fixed());
    let clock2 = clock1.clone();
    clock2.advance(Duration::hours(2));
    assert_eq!(clock1.now(), fixed() + Duration::hours(2));
}
