mod export;
mod summary;

pub use export::{
    write_events_csv, write_events_file, write_run_report, write_run_report_file, RunReport,
};
pub use summary::{
    plays_per_hour, plays_per_month, plays_per_station, plays_per_year, render_table, top_artists,
    top_songs,
};
