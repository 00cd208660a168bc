//! Sinusoidal time-of-day load profile and the reading generator.

use std::f64::consts::PI;

use chrono::{DateTime, FixedOffset, Timelike};
use serde::Deserialize;

use super::reading::{Reading, Status, UNIT_KWH};

/// Hours in one period of the daily load curve.
const HOURS_PER_DAY: f64 = 24.0;

/// A daily load profile that maps a wall-clock time to a meter reading.
///
/// `LoadProfile` models consumption as a sinusoid over a 24-hour period:
///
/// `usage = amplitude * sin(2π/24 * (hour_of_day - phase_shift)) + base_load`
///
/// where `hour_of_day` is the fractional hour (`hour + minute / 60`) in the
/// timestamp's own offset. Seconds are ignored. The curve rises through the
/// base load at `phase_shift` and reaches its maximum six hours later, so the
/// default profile peaks at 20:00 and bottoms out at 08:00. The profile holds
/// no mutable state: a reading depends only on the device id and timestamp.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use meter_sim::meter::{LoadProfile, Status};
///
/// let profile = LoadProfile::default();
/// let ts = DateTime::parse_from_rfc3339("2024-06-01T20:00:00+00:00").unwrap();
/// let reading = profile.reading("METER-001", ts);
///
/// assert_eq!(reading.value, 25.0);
/// assert_eq!(reading.status, Status::Peak);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadProfile {
    /// Amplitude of the daily swing (kWh).
    pub amplitude_kwh: f64,
    /// Hour at which the curve crosses the base load on its way up (hours).
    pub phase_shift_hr: f64,
    /// Mean consumption around which the curve oscillates (kWh).
    pub base_load_kwh: f64,
    /// Usage strictly above this value is classified as [`Status::Peak`] (kWh).
    pub peak_threshold_kwh: f64,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            amplitude_kwh: 10.0,
            phase_shift_hr: 14.0,
            base_load_kwh: 15.0,
            peak_threshold_kwh: 22.0,
        }
    }
}

impl LoadProfile {
    /// Unrounded consumption at the given fractional hour of day.
    pub fn usage_at_hour(&self, hour_of_day: f64) -> f64 {
        let angular = 2.0 * PI / HOURS_PER_DAY;
        self.amplitude_kwh * (angular * (hour_of_day - self.phase_shift_hr)).sin()
            + self.base_load_kwh
    }

    /// Unrounded consumption at the given timestamp.
    pub fn usage(&self, timestamp: &DateTime<FixedOffset>) -> f64 {
        self.usage_at_hour(hour_of_day(timestamp))
    }

    /// Classifies a usage value against the peak threshold.
    pub fn classify(&self, usage: f64) -> Status {
        if usage > self.peak_threshold_kwh {
            Status::Peak
        } else {
            Status::Normal
        }
    }

    /// Lowest value the curve can reach (kWh).
    pub fn min_usage(&self) -> f64 {
        self.base_load_kwh - self.amplitude_kwh.abs()
    }

    /// Produces the reading for `device_id` at `timestamp`.
    ///
    /// Classification uses the unrounded usage; the stored value is rounded
    /// to two decimal places.
    pub fn reading(&self, device_id: &str, timestamp: DateTime<FixedOffset>) -> Reading {
        let usage = self.usage(&timestamp);
        Reading {
            device_id: device_id.to_string(),
            timestamp,
            value: round_2dp(usage),
            unit: UNIT_KWH.to_string(),
            status: self.classify(usage),
        }
    }
}

/// Generates a reading with the default load profile.
///
/// Pure and total: identical inputs always produce identical readings.
pub fn generate(device_id: &str, timestamp: DateTime<FixedOffset>) -> Reading {
    LoadProfile::default().reading(device_id, timestamp)
}

/// Fractional hour of day (`hour + minute / 60`), ignoring seconds.
pub fn hour_of_day(timestamp: &DateTime<FixedOffset>) -> f64 {
    f64::from(timestamp.hour()) + f64::from(timestamp.minute()) / 60.0
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
