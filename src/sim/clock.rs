use chrono::{DateTime, Duration, FixedOffset, Local};
use parking_lot::Mutex;

/// Source of the current wall-clock time for meter ticks.
///
/// The scheduler asks the clock for "now" on every tick and on every
/// one-shot pass, so tests can pin readings to a known time of day.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use meter_sim::sim::clock::{Clock, FixedClock};
///
/// let t0 = DateTime::parse_from_rfc3339("2024-06-01T14:00:00+00:00").unwrap();
/// let clock = FixedClock::new(t0);
/// assert_eq!(clock.now(), t0);
///
/// clock.advance(chrono::Duration::minutes(30));
/// assert_eq!(clock.now().to_rfc3339(), "2024-06-01T14:30:00+00:00");
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current time together with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    current: Mutex<DateTime<FixedOffset>>,
}

impl FixedClock {
    /// Creates a clock pinned at `at`.
    pub fn new(at: DateTime<FixedOffset>) -> Self {
        Self {
            current: Mutex::new(at),
        }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: DateTime<FixedOffset>) {
        *self.current.lock() = at;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        let next = *current + by;
        *current = next;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.current.lock()
    }
}
