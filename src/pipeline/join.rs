use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};

use crate::error::{AppError, Result};
use crate::models::{ConsumptionRecord, FeedStation, TIMESTAMP_FORMAT};

/// Index over the mapping table: feed id to station name.
#[derive(Debug, Clone)]
pub struct StationMap {
    by_feed: HashMap<i64, String>,
}

impl StationMap {
    /// Build the index. Byte-equal duplicate rows collapse; two rows sending
    /// one feed to different stations would duplicate every consumption row
    /// for that feed in an outer join, so that is rejected outright.
    pub fn from_rows(rows: &[FeedStation]) -> Result<Self> {
        let mut by_feed: HashMap<i64, String> = HashMap::with_capacity(rows.len());
        for row in rows {
            match by_feed.get(&row.feed_id) {
                Some(existing) if existing != &row.station_name => {
                    return Err(AppError::JoinKeyCollision {
                        feed_id: row.feed_id,
                        existing: existing.clone(),
                        conflicting: row.station_name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    by_feed.insert(row.feed_id, row.station_name.clone());
                }
            }
        }
        Ok(Self { by_feed })
    }

    pub fn station_for(&self, feed_id: i64) -> Option<&str> {
        self.by_feed.get(&feed_id).map(String::as_str)
    }
}

/// A consumption row joined against the station mapping, timestamp parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinedRow {
    pub timestamp: DateTime<FixedOffset>,
    pub feed_id: i64,
    pub feed_name: String,
    pub artist: String,
    pub track: String,
    pub station_id: String,
}

/// Both sides of the outer join: consumption rows with a station attached,
/// and stations whose feeds reported nothing at all.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub rows: Vec<JoinedRow>,
    pub silent_stations: Vec<String>,
}

/// Outer-join consumption rows to the station mapping on feed id.
///
/// A feed with no mapping entry becomes its own single-feed station, keyed by
/// the feed id. Falling back to the feed name instead would split one feed
/// across its recorded name variants and inflate the duplicate count later.
pub fn join_stations(
    records: &[ConsumptionRecord],
    stations: &StationMap,
) -> Result<JoinOutcome> {
    let mut rows = Vec::with_capacity(records.len());
    let mut seen_feeds: HashSet<i64> = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let timestamp = DateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT).map_err(
            |_| AppError::TimestampParse {
                row: index + 1,
                value: record.timestamp.clone(),
            },
        )?;

        let station_id = match stations.station_for(record.feed_id) {
            Some(name) => name.to_string(),
            None => record.feed_id.to_string(),
        };

        seen_feeds.insert(record.feed_id);
        rows.push(JoinedRow {
            timestamp,
            feed_id: record.feed_id,
            feed_name: record.feed_name.clone(),
            artist: record.artist.clone(),
            track: record.track.clone(),
            station_id,
        });
    }

    // The mapping-only side of the outer join: stations the mapping knows
    // about but no feed reported for. Kept for station enumeration.
    let mut silent_stations: Vec<String> = stations
        .by_feed
        .iter()
        .filter(|(feed_id, _)| !seen_feeds.contains(feed_id))
        .map(|(_, station)| station.clone())
        .filter(|station| {
            !rows.iter().any(|row| &row.station_id == station)
        })
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    silent_stations.sort();

    if !silent_stations.is_empty() {
        tracing::info!(
            "{} stations have no reported plays: {}",
            silent_stations.len(),
            silent_stations.join(", ")
        );
    }

    Ok(JoinOutcome {
        rows,
        silent_stations,
    })
}
