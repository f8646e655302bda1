use std::path::PathBuf;

mod app;
mod config;
mod error;
mod loader;
mod models;
mod pipeline;
mod report;

use app::App;
use config::Config;
use error::Result;
use report::{
    plays_per_hour, plays_per_month, plays_per_station, plays_per_year, render_table, top_artists,
    top_songs, RunReport,
};

fn main() -> Result<()> {
    // Initialize logging (pipeline diagnostics go to stderr)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let mut inputs: Vec<PathBuf> = Vec::new();
    let mut output: Option<PathBuf> = None;
    let mut json_report: Option<PathBuf> = None;
    let mut show_summary = false;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--output" => {
                let Some(path) = iter.next() else {
                    return Err(anyhow::anyhow!("--output requires a path").into());
                };
                output = Some(PathBuf::from(path));
            }
            "--json" => {
                let Some(path) = iter.next() else {
                    return Err(anyhow::anyhow!("--json requires a path").into());
                };
                json_report = Some(PathBuf::from(path));
            }
            "--summary" => show_summary = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow::anyhow!("unknown flag: {}", flag).into());
            }
            path => inputs.push(PathBuf::from(path)),
        }
    }

    if inputs.len() != 2 {
        eprintln!(
            "Usage: spinclean <consumption.csv> <stations.csv> [--output <path>] [--summary] [--json <path>]"
        );
        std::process::exit(2);
    }

    // Load configuration
    let config = Config::load()?;
    let output = output.unwrap_or_else(|| PathBuf::from(&config.output_path));

    let app = App::new(config);
    let outcome = app.run(&inputs[0], &inputs[1])?;

    if show_summary {
        let limit = app.config.top_limit;
        let tables = [
            render_table("Plays per station", &plays_per_station(&outcome.events)),
            render_table("Top artists", &top_artists(&outcome.events, limit)),
            render_table("Top songs", &top_songs(&outcome.events, limit)),
            render_table("Plays per year", &plays_per_year(&outcome.events)),
            render_table("Plays per month", &plays_per_month(&outcome.events)),
            render_table("Plays per hour", &plays_per_hour(&outcome.events)),
        ];
        for table in &tables {
            println!("{}", table);
        }
    }

    report::write_events_file(&output, &outcome.events)?;

    if let Some(path) = json_report {
        let run_report = RunReport {
            generated_at: chrono::Utc::now(),
            consumption: outcome.consumption,
            dedup: outcome.dedup,
            play_events: outcome.events.len(),
            silent_stations: &outcome.silent_stations,
        };
        report::write_run_report_file(&path, &run_report)?;
        println!("Wrote run report to {:?}", path);
    }

    println!("Wrote {} play events to {:?}", outcome.events.len(), output);

    Ok(())
}
