use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the consumption log, e.g. `2016-05-14 07:40:32 +0100`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// One airplay report exactly as it appears in the raw consumption log.
///
/// The timestamp is kept as a string here; parsing happens in the join stage
/// so that a bad value can be reported with its row number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ConsumptionRecord {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Feed ID")]
    pub feed_id: i64,
    #[serde(rename = "Feed Name")]
    pub feed_name: String,
    #[serde(rename = "Artist")]
    pub artist: String,
    #[serde(rename = "Track")]
    pub track: String,
}

impl ConsumptionRecord {
    /// Key under which a report should be unique: the same feed reporting the
    /// same play twice is a reporting-level duplicate.
    pub fn report_key(&self) -> (&str, &str, &str, i64) {
        (&self.timestamp, &self.track, &self.artist, self.feed_id)
    }
}

/// One deduplicated play, attributed to a station.
#[derive(Debug, Clone, Serialize)]
pub struct PlayEvent {
    pub station_id: String,
    pub song: String,
    pub artist: String,
    pub track: String,
    pub feed_id: i64,
    pub feed_name: String,
    #[serde(with = "log_timestamp")]
    pub timestamp: DateTime<FixedOffset>,
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub time_of_day: NaiveTime,
}

impl PlayEvent {
    /// Build a canonical event, computing `song` and the calendar breakdown
    /// from the timestamp in its own UTC offset.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        feed_id: i64,
        feed_name: String,
        artist: String,
        track: String,
        station_id: String,
    ) -> Self {
        let song = format!("{} - {}", artist, track);
        let date = timestamp.date_naive();
        let time_of_day = timestamp.time();

        Self {
            station_id,
            song,
            artist,
            track,
            feed_id,
            feed_name,
            timestamp,
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            time_of_day,
        }
    }
}

/// Serialize timestamps back in the log's own format rather than RFC3339, so
/// the exported table round-trips with the input.
mod log_timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::Serializer;

    use super::TIMESTAMP_FORMAT;

    pub fn serialize<S>(value: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }
}
