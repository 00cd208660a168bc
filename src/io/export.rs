//! CSV export for reading snapshots.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::Result;
use crate::meter::Reading;

/// Column header for CSV snapshot export.
pub const HEADER: [&str; 5] = ["deviceId", "timestamp", "value", "unit", "status"];

/// Exports a snapshot to a CSV file at the given path.
///
/// Rows are sorted by device id, so identical snapshots always produce
/// identical files regardless of store iteration order.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(readings: &[Reading], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(readings, buf)
}

/// Writes a snapshot as CSV to any writer, sorted by device id.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(readings: &[Reading], writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut sorted: Vec<&Reading> = readings.iter().collect();
    sorted.sort_by(|a, b| a.device_id.cmp(&b.device_id));

    for r in sorted {
        wtr.write_record(&[
            r.device_id.clone(),
            r.timestamp.to_rfc3339(),
            format!("{:.2}", r.value),
            r.unit.clone(),
            r.status.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
