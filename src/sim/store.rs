//! Latest-value state store shared between meter tasks and readers.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::meter::Reading;

/// Concurrency-safe map from meter id to its most recent [`Reading`].
///
/// Writers take the lock exclusively for a single insert; readers share it
/// and clone out a snapshot. A reader therefore never observes a partially
/// written reading. Entries are never removed for the lifetime of the store.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use meter_sim::meter::generate;
/// use meter_sim::sim::store::StateStore;
///
/// let store = StateStore::new();
/// let ts = DateTime::parse_from_rfc3339("2024-06-01T02:00:00+00:00").unwrap();
/// store.write("METER-001", generate("METER-001", ts));
/// store.write("METER-001", generate("METER-001", ts));
///
/// assert_eq!(store.snapshot().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StateStore {
    readings: RwLock<HashMap<String, Reading>>,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the entry for `device_id` with `reading`.
    pub fn write(&self, device_id: &str, reading: Reading) {
        let mut readings = self.readings.write();
        match readings.get_mut(device_id) {
            Some(slot) => *slot = reading,
            None => {
                readings.insert(device_id.to_owned(), reading);
            }
        }
    }

    /// Copies out every current reading. Order is unspecified.
    pub fn snapshot(&self) -> Vec<Reading> {
        self.readings.read().values().cloned().collect()
    }

    /// Latest reading for a single meter, if it has ever been written.
    pub fn get(&self, device_id: &str) -> Option<Reading> {
        self.readings.read().get(device_id).cloned()
    }

    /// Number of distinct meters written so far.
    pub fn len(&self) -> usize {
        self.readings.read().len()
    }

    /// Returns `true` when nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.readings.read().is_empty()
    }
}
