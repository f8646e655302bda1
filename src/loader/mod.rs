mod reader;

pub use reader::{
    dedup_exact, load_consumption, load_consumption_file, load_stations, load_stations_file,
    LoadSummary,
};
