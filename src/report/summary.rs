use chrono::Timelike;
use itertools::Itertools;

use crate::models::PlayEvent;
use crate::pipeline::count_by;

/// Plays per station, busiest first, ties broken by name.
pub fn plays_per_station(events: &[PlayEvent]) -> Vec<(String, usize)> {
    sorted_by_count(count_by(events, |e| e.station_id.clone()))
}

/// The `limit` most played artists.
pub fn top_artists(events: &[PlayEvent], limit: usize) -> Vec<(String, usize)> {
    sorted_by_count(count_by(events, |e| e.artist.clone()))
        .into_iter()
        .take(limit)
        .collect()
}

/// The `limit` most played songs.
pub fn top_songs(events: &[PlayEvent], limit: usize) -> Vec<(String, usize)> {
    sorted_by_count(count_by(events, |e| e.song.clone()))
        .into_iter()
        .take(limit)
        .collect()
}

/// Plays per calendar year, chronological.
pub fn plays_per_year(events: &[PlayEvent]) -> Vec<(String, usize)> {
    count_by(events, |e| e.year)
        .into_iter()
        .sorted_by_key(|(year, _)| *year)
        .map(|(year, count)| (year.to_string(), count))
        .collect()
}

/// Plays per calendar month, chronological, keyed `YYYY-MM`.
pub fn plays_per_month(events: &[PlayEvent]) -> Vec<(String, usize)> {
    count_by(events, |e| format!("{:04}-{:02}", e.year, e.month))
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect()
}

/// Plays per hour of day, from midnight.
pub fn plays_per_hour(events: &[PlayEvent]) -> Vec<(String, usize)> {
    count_by(events, |e| e.time_of_day.hour())
        .into_iter()
        .sorted_by_key(|(hour, _)| *hour)
        .map(|(hour, count)| (format!("{:02}:00", hour), count))
        .collect()
}

/// Plain text table for stdout.
pub fn render_table(title: &str, rows: &[(String, usize)]) -> String {
    let label_width = rows
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0)
        .max(title.len());

    let mut out = String::new();
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(label_width + 8));
    out.push('\n');
    for (label, count) in rows {
        out.push_str(&format!("{:<width$}  {:>6}\n", label, count, width = label_width));
    }
    out
}

fn sorted_by_count(counts: indexmap::IndexMap<String, usize>) -> Vec<(String, usize)> {
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .collect()
}
