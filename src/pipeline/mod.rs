mod dedup;
mod group;
mod join;

pub use dedup::{dedup_events, DedupSummary};
pub use group::{count_by, group_by};
pub use join::{join_stations, JoinOutcome, JoinedRow, StationMap};
