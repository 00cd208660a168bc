//! Meter reading value type and status classification.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Unit label carried by every generated reading.
pub const UNIT_KWH: &str = "kWh";

/// Load classification attached to a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Consumption at or below the peak threshold.
    Normal,
    /// Consumption above the peak threshold.
    Peak,
    /// Device under maintenance. Never produced by the load profile.
    Maintenance,
}

impl Status {
    /// Every status, in display order.
    pub const ALL: [Status; 3] = [Status::Normal, Status::Peak, Status::Maintenance];

    /// Returns the wire name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Normal => "Normal",
            Status::Peak => "Peak",
            Status::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown status \"{s}\", expected one of Normal, Peak, Maintenance")
            })
    }
}

/// One observation from a simulated smart meter.
///
/// Serializes with camelCase keys (`deviceId`, `timestamp`, `value`, `unit`,
/// `status`) and an RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Meter identifier, e.g. `METER-001`.
    pub device_id: String,
    /// Instant the reading was taken, with its UTC offset.
    pub timestamp: DateTime<FixedOffset>,
    /// Energy consumption in kWh, rounded to two decimals.
    pub value: f64,
    /// Unit label, always [`UNIT_KWH`] for generated readings.
    pub unit: String,
    /// Load classification.
    pub status: Status,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {} | {:>7.2} {} | {}",
            self.device_id,
            self.timestamp.to_rfc3339(),
            self.value,
            self.unit,
            self.status,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reading {
        let ts = DateTime::parse_from_rfc3339("2024-06-01T14:00:00+02:00").unwrap();
        Reading {
            device_id: "METER-001".to_string(),
            timestamp: ts,
            value: 25.0,
            unit: UNIT_KWH.to_string(),
            status: Status::Peak,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["deviceId"], "METER-001");
        assert_eq!(json["timestamp"], "2024-06-01T14:00:00+02:00");
        assert_eq!(json["value"], 25.0);
        assert_eq!(json["unit"], "kWh");
        assert_eq!(json["status"], "Peak");
        assert!(json.get("device_id").is_none());
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("peak".parse::<Status>(), Ok(Status::Peak));
        assert_eq!("Normal".parse::<Status>(), Ok(Status::Normal));
        assert_eq!("MAINTENANCE".parse::<Status>(), Ok(Status::Maintenance));
        assert!("offline".parse::<Status>().is_err());
    }

    #[test]
    fn display_does_not_panic() {
        let s = format!("{}", sample());
        assert!(s.contains("METER-001"));
        assert!(s.contains("Peak"));
    }
}
