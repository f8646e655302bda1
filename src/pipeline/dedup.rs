use std::collections::HashSet;

use serde::Serialize;

use crate::error::{AppError, Result};
use crate::loader::dedup_exact;
use crate::pipeline::group::group_by;
use crate::pipeline::join::JoinedRow;

/// Row counts for the two dedup passes over the joined table.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DedupSummary {
    pub exact_duplicates_removed: usize,
    /// Rows collapsed because several feeds of one station reported the same
    /// play at the same instant.
    pub shared_feed_duplicates_removed: usize,
}

/// Reduce the joined table to one counted play per station per instant.
///
/// First drops rows identical in every joined column, then collapses rows
/// sharing `(timestamp, track, artist, station_id)`, keeping the first. The
/// result is verified with a per-station count before it is returned.
pub fn dedup_events(rows: Vec<JoinedRow>) -> Result<(Vec<JoinedRow>, DedupSummary)> {
    let (rows, exact_duplicates_removed) = dedup_exact(rows);

    let before = rows.len();
    let mut seen = HashSet::with_capacity(before);
    let rows: Vec<JoinedRow> = rows
        .into_iter()
        .filter(|row| {
            seen.insert((
                row.timestamp,
                row.track.clone(),
                row.artist.clone(),
                row.station_id.clone(),
            ))
        })
        .collect();
    let shared_feed_duplicates_removed = before - rows.len();

    verify_station_counts(&rows)?;

    tracing::info!(
        "Deduplicated to {} play events ({} exact, {} shared-feed duplicates dropped)",
        rows.len(),
        exact_duplicates_removed,
        shared_feed_duplicates_removed
    );

    Ok((
        rows,
        DedupSummary {
            exact_duplicates_removed,
            shared_feed_duplicates_removed,
        },
    ))
}

/// Post-condition: summing count-distinct `(timestamp, track, artist,
/// feed_id)` over station groups must reproduce the table's row count. A
/// mismatch means the dedup passes above are defective.
fn verify_station_counts(rows: &[JoinedRow]) -> Result<()> {
    let groups = group_by(rows, |row| row.station_id.clone());
    let distinct: usize = groups
        .values()
        .map(|station_rows| {
            station_rows
                .iter()
                .map(|row| (row.timestamp, &row.track, &row.artist, row.feed_id))
                .collect::<HashSet<_>>()
                .len()
        })
        .sum();

    if distinct != rows.len() {
        return Err(AppError::ConsistencyCheck {
            distinct,
            total: rows.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::models::TIMESTAMP_FORMAT;

    fn row(timestamp: &str, feed_id: i64, station_id: &str, track: &str) -> JoinedRow {
        JoinedRow {
            timestamp: DateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).unwrap(),
            feed_id,
            feed_name: format!("Feed {}", feed_id),
            artist: "Artist".to_string(),
            track: track.to_string(),
            station_id: station_id.to_string(),
        }
    }

    #[test]
    fn same_station_two_feeds_collapse_to_one_play() {
        let rows = vec![
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
            row("2016-05-14 07:40:32 +0100", 2, "Station One", "Song"),
        ];
        let (rows, summary) = dedup_events(rows).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].feed_id, 1);
        assert_eq!(summary.shared_feed_duplicates_removed, 1);
    }

    #[test]
    fn different_stations_keep_both_plays() {
        let rows = vec![
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
            row("2016-05-14 07:40:32 +0100", 2, "Station Two", "Song"),
        ];
        let (rows, summary) = dedup_events(rows).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(summary.shared_feed_duplicates_removed, 0);
    }

    #[test]
    fn rows_duplicated_by_the_join_are_dropped_first() {
        let rows = vec![
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
        ];
        let (rows, summary) = dedup_events(rows).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(summary.exact_duplicates_removed, 1);
        assert_eq!(summary.shared_feed_duplicates_removed, 0);
    }

    #[test]
    fn output_is_unique_per_station_play() {
        let rows = vec![
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
            row("2016-05-14 07:40:32 +0100", 2, "Station One", "Song"),
            row("2016-05-14 07:40:32 +0100", 3, "Station Two", "Song"),
            row("2016-05-14 09:00:00 +0100", 1, "Station One", "Other"),
        ];
        let (rows, _) = dedup_events(rows).unwrap();

        let keys: HashSet<_> = rows
            .iter()
            .map(|r| (r.timestamp, &r.track, &r.artist, &r.station_id))
            .collect();
        assert_eq!(keys.len(), rows.len());
    }

    #[test]
    fn consistency_check_accepts_a_clean_table() {
        let rows = vec![
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
            row("2016-05-14 08:00:00 +0100", 1, "Station One", "Song"),
        ];
        assert!(verify_station_counts(&rows).is_ok());
    }

    #[test]
    fn consistency_check_rejects_a_double_counted_play() {
        // Hand-built table that skipped business dedup: the same feed-level
        // report appears twice under one station.
        let rows = vec![
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
            row("2016-05-14 07:40:32 +0100", 1, "Station One", "Song"),
        ];
        let err = verify_station_counts(&rows).unwrap_err();
        assert!(matches!(
            err,
            AppError::ConsistencyCheck {
                distinct: 1,
                total: 2
            }
        ));
    }
}
