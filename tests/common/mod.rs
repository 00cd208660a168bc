//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use meter_sim::sim::clock::FixedClock;
use meter_sim::sim::scheduler::Scheduler;
use meter_sim::sim::store::StateStore;

/// Parses an RFC 3339 timestamp.
pub fn at(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).expect("valid RFC 3339 timestamp")
}

/// 20:00 UTC, where the default curve is at its 25 kWh maximum (Peak).
pub fn evening_peak() -> DateTime<FixedOffset> {
    at("2024-06-01T20:00:00+00:00")
}

/// 02:00 UTC, where the default curve crosses its 15 kWh base (Normal).
pub fn night() -> DateTime<FixedOffset> {
    at("2024-06-01T02:00:00+00:00")
}

/// Scheduler over a fresh store, reading time from a frozen clock.
///
/// Returns the clock too so tests can move time between ticks.
pub fn fixed_scheduler(
    prefix: &str,
    now: DateTime<FixedOffset>,
) -> (Arc<Scheduler>, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(now));
    let scheduler = Scheduler::new(Arc::new(StateStore::new()))
        .with_prefix(prefix)
        .with_clock(clock.clone());
    (Arc::new(scheduler), clock)
}

/// Device ids currently in `store`, sorted.
pub fn sorted_ids(store: &StateStore) -> Vec<String> {
    let mut ids: Vec<String> = store.snapshot().into_iter().map(|r| r.device_id).collect();
    ids.sort();
    ids
}
