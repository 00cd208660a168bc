//! Aggregate figures computed from a snapshot of readings.

use std::fmt;

use serde::Serialize;

use crate::meter::{Reading, Status};

/// Fleet-wide summary derived from one snapshot.
///
/// Computed post-hoc from the readings so the figures always agree with the
/// snapshot they were taken from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of meters in the snapshot.
    pub device_count: usize,
    /// Meters currently classified as [`Status::Peak`].
    pub peak_count: usize,
    /// Meters currently classified as [`Status::Normal`].
    pub normal_count: usize,
    /// Meters currently classified as [`Status::Maintenance`].
    pub maintenance_count: usize,
    /// Sum of all latest values (kWh).
    pub total_kwh: f64,
    /// Mean of all latest values (kWh).
    pub mean_kwh: f64,
    /// Largest latest value (kWh).
    pub max_kwh: f64,
    /// Whether background meter tasks are running.
    pub running: bool,
}

impl Summary {
    /// Computes the summary of `readings`.
    ///
    /// # Arguments
    ///
    /// * `readings` - Snapshot to summarise, in any order
    /// * `running` - Whether the scheduler currently has an active run
    pub fn from_readings(readings: &[Reading], running: bool) -> Self {
        let mut peak = 0;
        let mut normal = 0;
        let mut maintenance = 0;
        let mut total = 0.0_f64;
        let mut max = 0.0_f64;

        for r in readings {
            match r.status {
                Status::Peak => peak += 1,
                Status::Normal => normal += 1,
                Status::Maintenance => maintenance += 1,
            }
            total += r.value;
            max = max.max(r.value);
        }

        let mean = if readings.is_empty() {
            0.0
        } else {
            total / readings.len() as f64
        };

        Self {
            device_count: readings.len(),
            peak_count: peak,
            normal_count: normal,
            maintenance_count: maintenance,
            total_kwh: round_2dp(total),
            mean_kwh: round_2dp(mean),
            max_kwh: max,
            running,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Fleet Summary ---")?;
        writeln!(f, "Meters:        {}", self.device_count)?;
        writeln!(
            f,
            "Peak/Normal:   {}/{} ({} in maintenance)",
            self.peak_count, self.normal_count, self.maintenance_count
        )?;
        writeln!(f, "Total load:    {:.2} kWh", self.total_kwh)?;
        writeln!(f, "Mean load:     {:.2} kWh", self.mean_kwh)?;
        write!(f, "Max load:      {:.2} kWh", self.max_kwh)
    }
}

fn round_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::meter::UNIT_KWH;

    fn reading(id: &str, value: f64, status: Status) -> Reading {
        Reading {
            device_id: id.to_string(),
            timestamp: DateTime::parse_from_rfc3339("2024-06-01T12:00:00+00:00").unwrap(),
            value,
            unit: UNIT_KWH.to_string(),
            status,
        }
    }

    #[test]
    fn empty_snapshot_is_all_zero() {
        let s = Summary::from_readings(&[], false);
        assert_eq!(s.device_count, 0);
        assert_eq!(s.total_kwh, 0.0);
        assert_eq!(s.mean_kwh, 0.0);
        assert_eq!(s.max_kwh, 0.0);
        assert!(!s.running);
    }

    #[test]
    fn counts_and_totals() {
        let readings = vec![
            reading("A", 25.0, Status::Peak),
            reading("B", 15.0, Status::Normal),
            reading("C", 10.5, Status::Normal),
            reading("D", 0.0, Status::Maintenance),
        ];
        let s = Summary::from_readings(&readings, true);
        assert_eq!(s.device_count, 4);
        assert_eq!(s.peak_count, 1);
        assert_eq!(s.normal_count, 2);
        assert_eq!(s.maintenance_count, 1);
        assert_eq!(s.total_kwh, 50.5);
        assert_eq!(s.mean_kwh, 12.63);
        assert_eq!(s.max_kwh, 25.0);
        assert!(s.running);
    }

    #[test]
    fn serializes_camel_case() {
        let s = Summary::from_readings(&[reading("A", 1.0, Status::Normal)], false);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["deviceCount"], 1);
        assert_eq!(json["totalKwh"], 1.0);
        assert_eq!(json["running"], false);
    }

    #[test]
    fn display_does_not_panic() {
        let s = Summary::from_readings(&[reading("A", 1.0, Status::Normal)], false);
        assert!(format!("{s}").contains("Meters:"));
    }
}
