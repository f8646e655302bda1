mod play;
mod station;

pub use play::{ConsumptionRecord, PlayEvent, TIMESTAMP_FORMAT};
pub use station::FeedStation;
