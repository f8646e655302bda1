use std::collections::HashSet;
use std::fs::File;
use std::hash::Hash;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::models::{ConsumptionRecord, FeedStation};

const CONSUMPTION_COLUMNS: [&str; 5] = ["Timestamp", "Feed ID", "Feed Name", "Artist", "Track"];
const STATION_COLUMNS: [&str; 2] = ["Feed ID", "Station Name"];

/// Row counts surfaced by the loader. Informational: the exact-duplicate drop
/// is the loader's only mutation, the rest is observability.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub exact_duplicates_removed: usize,
    /// Rows still sharing a `(timestamp, track, artist, feed_id)` key after
    /// the exact drop. These differ in feed name only and are left in place.
    pub report_key_duplicates: usize,
}

pub fn load_consumption_file(path: &Path) -> Result<(Vec<ConsumptionRecord>, LoadSummary)> {
    load_consumption(File::open(path)?)
}

/// Read the consumption log: normalize headers, check the schema, and drop
/// rows that duplicate an earlier row in every field.
pub fn load_consumption<R: Read>(source: R) -> Result<(Vec<ConsumptionRecord>, LoadSummary)> {
    let mut reader = csv::Reader::from_reader(source);
    normalize_headers(&mut reader, &CONSUMPTION_COLUMNS, "consumption")?;

    let mut rows: Vec<ConsumptionRecord> = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    if rows.is_empty() {
        return Err(AppError::EmptyDataset {
            name: "consumption",
        });
    }

    let rows_read = rows.len();
    let (rows, exact_duplicates_removed) = dedup_exact(rows);
    let report_key_duplicates = count_report_key_duplicates(&rows);

    tracing::info!(
        "Loaded {} consumption rows, dropped {} exact duplicates, {} report-key duplicates remain",
        rows.len(),
        exact_duplicates_removed,
        report_key_duplicates
    );

    Ok((
        rows,
        LoadSummary {
            rows_read,
            exact_duplicates_removed,
            report_key_duplicates,
        },
    ))
}

pub fn load_stations_file(path: &Path) -> Result<Vec<FeedStation>> {
    load_stations(File::open(path)?)
}

/// Read the feed-to-station mapping. The mapping is used as-is: no duplicate
/// pass here, the join stage rejects conflicting rows instead.
pub fn load_stations<R: Read>(source: R) -> Result<Vec<FeedStation>> {
    let mut reader = csv::Reader::from_reader(source);
    normalize_headers(&mut reader, &STATION_COLUMNS, "station mapping")?;

    let mut rows: Vec<FeedStation> = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    if rows.is_empty() {
        return Err(AppError::EmptyDataset { name: "station mapping" });
    }

    tracing::info!("Loaded {} feed-to-station mappings", rows.len());
    Ok(rows)
}

/// Trim stray whitespace from every header (the source data ships one column
/// as `"Track "`) and verify the required columns are present.
fn normalize_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    required: &[&str],
    dataset: &str,
) -> Result<()> {
    let headers = reader.headers()?.clone();
    let mut normalized = StringRecord::new();
    for header in headers.iter() {
        let trimmed = header.trim();
        if trimmed != header {
            tracing::warn!(
                "{}: renamed malformed column '{}' to '{}'",
                dataset,
                header,
                trimmed
            );
        }
        normalized.push_field(trimmed);
    }

    for column in required {
        if !normalized.iter().any(|h| h == *column) {
            return Err(AppError::MalformedInput(format!(
                "{} input is missing required column '{}'",
                dataset, column
            )));
        }
    }

    reader.set_headers(normalized);
    Ok(())
}

/// Drop rows equal to an earlier row, keeping the first copy. Applying this
/// twice yields the same table as applying it once.
pub fn dedup_exact<T: Eq + Hash + Clone>(rows: Vec<T>) -> (Vec<T>, usize) {
    let before = rows.len();
    let mut seen = HashSet::with_capacity(before);
    let deduped: Vec<T> = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();
    let removed = before - deduped.len();
    (deduped, removed)
}

fn count_report_key_duplicates(rows: &[ConsumptionRecord]) -> usize {
    let distinct: HashSet<_> = rows.iter().map(|r| r.report_key()).collect();
    rows.len() - distinct.len()
}
