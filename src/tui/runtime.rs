//! TUI application state backed by the live reading store.

use std::sync::Arc;
use std::time::Instant;

use crate::meter::{Reading, Status};
use crate::sim::scheduler::Scheduler;
use crate::sim::summary::Summary;

/// Refresh interval options in milliseconds (slowest → fastest).
const REFRESH_LEVELS_MS: [u64; 5] = [2000, 1000, 500, 250, 100];

/// Default refresh index (500 ms).
const DEFAULT_REFRESH_IDX: usize = 2;

/// TUI application state.
///
/// The simulation keeps running on the tokio runtime regardless of what the
/// UI does; pausing only freezes the displayed snapshot.
pub struct App {
    /// Scheduler whose store is being displayed.
    scheduler: Arc<Scheduler>,
    /// Displayed readings, sorted by device id and filtered.
    pub rows: Vec<Reading>,
    /// Aggregates over the full (unfiltered) snapshot.
    pub summary: Summary,
    /// Only show readings with this status, when set.
    pub filter: Option<Status>,
    /// Index of the first visible row.
    pub scroll: usize,
    /// Whether display refresh is paused.
    pub paused: bool,
    /// Current index into `REFRESH_LEVELS_MS`.
    pub refresh_idx: usize,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the snapshot was last refreshed.
    pub last_refresh: Instant,
    /// Number of refreshes taken so far.
    pub refreshes: u64,
}

impl App {
    /// Creates an app and takes the first snapshot.
    pub fn new(scheduler: Arc<Scheduler>) -> Self {
        let mut app = Self {
            scheduler,
            rows: Vec::new(),
            summary: Summary::from_readings(&[], false),
            filter: None,
            scroll: 0,
            paused: false,
            refresh_idx: DEFAULT_REFRESH_IDX,
            quit: false,
            last_refresh: Instant::now(),
            refreshes: 0,
        };
        app.refresh();
        app
    }

    /// Re-reads the store and rebuilds the visible rows.
    pub fn refresh(&mut self) {
        let mut readings = self.scheduler.store().snapshot();
        readings.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        self.summary = Summary::from_readings(&readings, self.scheduler.is_running());
        if let Some(status) = self.filter {
            readings.retain(|r| r.status == status);
        }
        self.rows = readings;
        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
        self.refreshes += 1;
    }

    /// Toggles pause/resume of display refresh.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Refreshes more often.
    pub fn speed_up(&mut self) {
        if self.refresh_idx + 1 < REFRESH_LEVELS_MS.len() {
            self.refresh_idx += 1;
        }
    }

    /// Refreshes less often.
    pub fn speed_down(&mut self) {
        if self.refresh_idx > 0 {
            self.refresh_idx -= 1;
        }
    }

    /// Returns the current refresh interval in milliseconds.
    pub fn refresh_interval_ms(&self) -> u64 {
        REFRESH_LEVELS_MS[self.refresh_idx]
    }

    /// Cycles the status filter: all → Normal → Peak → Maintenance → all.
    pub fn cycle_filter(&mut self) {
        self.filter = match self.filter {
            None => Some(Status::Normal),
            Some(Status::Normal) => Some(Status::Peak),
            Some(Status::Peak) => Some(Status::Maintenance),
            Some(Status::Maintenance) => None,
        };
        self.scroll = 0;
        self.refresh();
    }

    /// Scrolls the table down by `n` rows.
    pub fn scroll_down(&mut self, n: usize) {
        let max = self.rows.len().saturating_sub(1);
        self.scroll = (self.scroll + n).min(max);
    }

    /// Scrolls the table up by `n` rows.
    pub fn scroll_up(&mut self, n: usize) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    /// Whether the underlying simulation is still ticking.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Meter id prefix of the simulation.
    pub fn prefix(&self) -> &str {
        self.scheduler.prefix()
    }
}
