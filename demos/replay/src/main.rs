//! replay: feeds recorded trips through the arrival detector.
//!
//! Each trip CSV is loaded, fed to a fresh detector with its recorded timing
//! (divided by `--speed-up`), and checked against the get-ready /
//! pull-the-cord readings flagged in the recording or given on the command
//! line.  One summary line is printed per trip; the process exits non-zero if
//! any trip fails.
//!
//! ```text
//! RUST_LOG=debug cargo run -p replay -- crates/tad-replay/fixtures/tad_trip2.csv
//! cargo run -p replay -- --synthetic --trace-dir out/
//! ```

mod config;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::info;

use tad_replay::{
    CorpusEntry, CsvTraceWriter, Expectation, ReplayConfig, ReplayReport, ReplayResult,
    SyntheticTrip, load_trip_csv, replay_corpus,
};

use config::load_config;

#[derive(Parser)]
#[command(version, about = "Replay recorded trips and verify when the arrival alerts fire")]
struct Args {
    /// Recorded trip CSV files
    trips: Vec<PathBuf>,
    /// Load detector and replay settings from JSON
    #[arg(long)]
    config: Option<PathBuf>,
    /// Divide recorded delays by this factor (overrides the config)
    #[arg(long)]
    speed_up: Option<u32>,
    /// Write a per-reading trace CSV for each trip into this directory
    #[arg(long)]
    trace_dir: Option<PathBuf>,
    /// Expected get-ready reading, overriding the recorded flags
    #[arg(long, requires = "finish_index")]
    ready_index: Option<usize>,
    /// Expected pull-the-cord reading, overriding the recorded flags
    #[arg(long, requires = "ready_index")]
    finish_index: Option<usize>,
    /// Also replay a generated trip
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ReplayConfig::default(),
    };
    if let Some(speed_up) = args.speed_up {
        config.speed_up = speed_up;
    }
    config.validate().context("invalid replay settings")?;

    let expected = match (args.ready_index, args.finish_index) {
        (Some(ready_index), Some(finish_index)) => Some(Expectation { ready_index, finish_index }),
        _ => None,
    };

    let mut entries = Vec::with_capacity(args.trips.len() + 1);
    for path in &args.trips {
        let trip = load_trip_csv(path).with_context(|| format!("loading trip {}", path.display()))?;
        info!("loaded {} readings from {}", trip.len(), path.display());
        entries.push(CorpusEntry { trip, expected });
    }
    if args.synthetic {
        entries.push(CorpusEntry::new(SyntheticTrip::default().build()));
    }
    if entries.is_empty() {
        bail!("no trips to replay: pass one or more TRIP.csv files or --synthetic");
    }

    let t0 = Instant::now();
    let results = match &args.trace_dir {
        Some(dir) => run_traced(&entries, &config, dir)?,
        None => replay_corpus(&entries, &config),
    };
    let elapsed = t0.elapsed();

    let mut failures = 0usize;
    for (entry, result) in entries.iter().zip(&results) {
        match result {
            Ok(report) => println!("{}", summary(report)),
            Err(e) => {
                failures += 1;
                println!("{}: FAILED  {e}", entry.trip.trip_id());
            }
        }
    }
    println!("{} trips in {:.3}s, {failures} failed", results.len(), elapsed.as_secs_f64());

    if failures > 0 {
        bail!("{failures} of {} trips failed verification", results.len());
    }
    Ok(())
}

/// Replay each entry sequentially with a trace writer attached.
fn run_traced(
    entries: &[CorpusEntry],
    config: &ReplayConfig,
    dir: &Path,
) -> Result<Vec<ReplayResult<ReplayReport>>> {
    fs::create_dir_all(dir).with_context(|| format!("creating trace directory {}", dir.display()))?;

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let trip_id = entry.trip.trip_id();
        let mut writer = CsvTraceWriter::create(dir, trip_id)
            .with_context(|| format!("creating trace for trip {trip_id}"))?;
        let result = entry.run_observed(config, &mut writer);
        if let Some(e) = writer.take_error() {
            return Err(e).with_context(|| format!("writing trace for trip {trip_id}"));
        }
        results.push(result);
    }
    Ok(results)
}

fn summary(report: &ReplayReport) -> String {
    let index = |i: Option<usize>| i.map_or_else(|| "-".to_owned(), |i| i.to_string());
    let verdict = if report.verified.is_some() { "ok" } else { "replayed" };
    format!(
        "{}: {verdict}  ready at {}  finished at {}  ({} readings fed, {} low accuracy, {} rejected, {:.0}s recorded)",
        report.trip_id,
        index(report.ready_at),
        index(report.finished_at),
        report.readings_fed,
        report.low_accuracy,
        report.rejected,
        report.recorded.as_secs_f64(),
    )
}
