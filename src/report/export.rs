use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::loader::LoadSummary;
use crate::models::PlayEvent;
use crate::pipeline::DedupSummary;

/// Diagnostics for one pipeline run, exported as JSON next to the table.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub consumption: LoadSummary,
    pub dedup: DedupSummary,
    pub play_events: usize,
    pub silent_stations: &'a [String],
}

/// Write the canonical table as CSV, one line per play event.
pub fn write_events_csv<W: Write>(writer: W, events: &[PlayEvent]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for event in events {
        writer.serialize(event)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_events_file(path: &Path, events: &[PlayEvent]) -> Result<()> {
    write_events_csv(File::create(path)?, events)
}

pub fn write_run_report<W: Write>(writer: W, report: &RunReport) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub fn write_run_report_file(path: &Path, report: &RunReport) -> Result<()> {
    write_run_report(File::create(path)?, report)
}
