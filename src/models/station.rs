use serde::Deserialize;

/// One row of the feed-to-station mapping. Several feeds may belong to the
/// same station; a feed missing from this table has an unknown station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedStation {
    #[serde(rename = "Feed ID")]
    pub feed_id: i64,
    #[serde(rename = "Station Name")]
    pub station_name: String,
}
