use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("{name} dataset contains no rows")]
    EmptyDataset { name: &'static str },

    #[error("row {row}: cannot parse timestamp '{value}'")]
    TimestampParse { row: usize, value: String },

    #[error("feed {feed_id} is mapped to both '{existing}' and '{conflicting}'")]
    JoinKeyCollision {
        feed_id: i64,
        existing: String,
        conflicting: String,
    },

    #[error("consistency check failed: {distinct} distinct plays across stations but {total} rows in table")]
    ConsistencyCheck { distinct: usize, total: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
