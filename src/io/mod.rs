//! Snapshot export formats.

/// CSV export of reading snapshots.
pub mod export;
