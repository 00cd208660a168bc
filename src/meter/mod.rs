//! Simulated smart meters: readings, the daily load profile, and identifiers.

/// Sinusoidal time-of-day load profile.
pub mod profile;
/// Reading value type and status classification.
pub mod reading;

pub use profile::{LoadProfile, generate};
pub use reading::{Reading, Status, UNIT_KWH};

/// Default identifier prefix for simulated meters.
pub const DEFAULT_ID_PREFIX: &str = "ENTITY";

/// Formats the identifier of the `index`-th meter (1-based), e.g. `ENTITY-007`.
pub fn meter_id(prefix: &str, index: usize) -> String {
    format!("{prefix}-{index:03}")
}

/// Identifiers `{prefix}-001 ..= {prefix}-{count:03}` in order.
pub fn meter_ids(prefix: &str, count: usize) -> impl Iterator<Item = String> + '_ {
    (1..=count).map(move |i| meter_id(prefix, i))
}
