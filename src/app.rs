use std::path::Path;

use crate::config::Config;
use crate::error::Result;
use crate::loader::{load_consumption_file, load_stations_file, LoadSummary};
use crate::models::PlayEvent;
use crate::pipeline::{dedup_events, join_stations, DedupSummary, StationMap};

/// Everything one pipeline run produces: the canonical table plus the
/// diagnostics the run report and summary need.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub events: Vec<PlayEvent>,
    pub silent_stations: Vec<String>,
    pub consumption: LoadSummary,
    pub dedup: DedupSummary,
}

pub struct App {
    pub config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the whole batch transform: load both inputs, join on feed id,
    /// deduplicate, and derive the canonical play-event fields.
    pub fn run(&self, consumption_path: &Path, stations_path: &Path) -> Result<PipelineOutcome> {
        tracing::info!("Reading consumption log {:?}", consumption_path);
        let (records, consumption) = load_consumption_file(consumption_path)?;

        tracing::info!("Reading station mapping {:?}", stations_path);
        let mapping = load_stations_file(stations_path)?;
        let stations = StationMap::from_rows(&mapping)?;

        let joined = join_stations(&records, &stations)?;
        let (rows, dedup) = dedup_events(joined.rows)?;

        let events: Vec<PlayEvent> = rows
            .into_iter()
            .map(|row| {
                PlayEvent::new(
                    row.timestamp,
                    row.feed_id,
                    row.feed_name,
                    row.artist,
                    row.track,
                    row.station_id,
                )
            })
            .collect();

        Ok(PipelineOutcome {
            events,
            silent_stations: joined.silent_stations,
            consumption,
            dedup,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn end_to_end_run_produces_a_clean_table() {
        // "Track " header is intentionally malformed; rows cover an exact
        // duplicate, a shared-station duplicate, and an unmapped feed.
        let consumption = write_file(
            "Timestamp,Feed ID,Feed Name,Artist,Track \n\
             2016-05-14 07:40:32 +0100,1,Feed A,Radiohead,Reckoner\n\
             2016-05-14 07:40:32 +0100,1,Feed A,Radiohead,Reckoner\n\
             2016-05-14 07:40:32 +0100,2,Feed B,Radiohead,Reckoner\n\
             2016-05-14 09:00:00 +0100,7,Lone Feed,Portishead,Roads\n",
        );
        let stations = write_file(
            "Feed ID,Station Name\n\
             1,Station One\n\
             2,Station One\n\
             3,Station Idle\n",
        );

        let app = App::new(Config::default());
        let outcome = app.run(consumption.path(), stations.path()).unwrap();

        // One play for Station One (two feeds, one instant), one for feed 7.
        assert_eq!(outcome.events.len(), 2);
        assert_eq!(outcome.consumption.exact_duplicates_removed, 1);
        assert_eq!(outcome.dedup.shared_feed_duplicates_removed, 1);
        assert_eq!(outcome.silent_stations, vec!["Station Idle".to_string()]);

        let by_station: Vec<_> = outcome.events.iter().map(|e| e.station_id.as_str()).collect();
        assert!(by_station.contains(&"Station One"));
        assert!(by_station.contains(&"7"));

        // Uniqueness invariant of the canonical table.
        let keys: HashSet<_> = outcome
            .events
            .iter()
            .map(|e| (e.timestamp, &e.track, &e.artist, &e.station_id))
            .collect();
        assert_eq!(keys.len(), outcome.events.len());

        // Derived fields come from the parsed timestamp.
        let reckoner = outcome
            .events
            .iter()
            .find(|e| e.station_id == "Station One")
            .unwrap();
        assert_eq!(reckoner.song, "Radiohead - Reckoner");
        assert_eq!((reckoner.year, reckoner.month, reckoner.day), (2016, 5, 14));
    }

    #[test]
    fn bad_timestamp_aborts_the_run() {
        let consumption = write_file(
            "Timestamp,Feed ID,Feed Name,Artist,Track\n\
             not-a-timestamp,1,Feed A,Radiohead,Reckoner\n",
        );
        let stations = write_file("Feed ID,Station Name\n1,Station One\n");

        let app = App::new(Config::default());
        let err = app.run(consumption.path(), stations.path()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::TimestampParse { row: 1, .. }
        ));
    }
}
