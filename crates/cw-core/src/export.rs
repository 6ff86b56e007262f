//! CSV export of anomaly reports.
//!
//! UTF-8, header row, one row per flagged reading, store column order plus
//! the score column. Zone names and numbers never contain delimiters, so
//! no quoting is required.

use chrono::SecondsFormat;
use cw_common::Result;
use cw_detect::AnomalyReport;
use std::io::Write;
use std::path::Path;

const HEADER: &str = "timestamp,location,traffic_volume,avg_speed,anomaly_score";

/// Write a report as CSV to any writer.
pub fn write_csv<W: Write>(report: &AnomalyReport, out: &mut W) -> Result<()> {
    writeln!(out, "{}", HEADER)?;
    for f in &report.flagged {
        let r = &f.reading;
        writeln!(
            out,
            "{},{},{},{},{}",
            r.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            r.zone,
            r.volume,
            r.speed,
            f.score
        )?;
    }
    Ok(())
}

/// Write a report as CSV to a file path.
pub fn export_to_path(report: &AnomalyReport, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_csv(report, &mut file)?;
    file.flush()?;
    tracing::info!(path = %path.display(), rows = report.flagged.len(), "exported anomaly report");
    Ok(())
}
