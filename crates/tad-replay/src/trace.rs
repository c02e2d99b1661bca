//! CSV trace of a replay: one row per fed reading.
//!
//! ```csv
//! index,lat,lng,speed,accuracy,dist_before_m,dist_destination_m,radius_m,status,ready,finished
//! 0,28.05878993,-82.4139,5.0,8.0,10.0,590.0,100.0,accepted,1,0
//! ```
//!
//! `status` is `accepted`, `low_accuracy`, or `rejected`; distance columns are
//! empty for rejected readings.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use csv::Writer;
use tad_core::{Reading, TripId};
use tad_detect::{Phase, UpdateOutcome};

use crate::driver::ReplayObserver;
use crate::ReplayError;

const HEADER: [&str; 11] = [
    "index",
    "lat",
    "lng",
    "speed",
    "accuracy",
    "dist_before_m",
    "dist_destination_m",
    "radius_m",
    "status",
    "ready",
    "finished",
];

/// A [`ReplayObserver`] writing a per-reading CSV trace.
///
/// Errors are stored internally because observer methods have no return
/// value.  After the replay, check with [`take_error`][Self::take_error].
pub struct CsvTraceWriter<W: Write> {
    writer:     Writer<W>,
    last_error: Option<ReplayError>,
}

impl CsvTraceWriter<File> {
    /// Create `<dir>/<trip_id>_trace.csv` and write the header row.
    pub fn create(dir: &Path, trip: &TripId) -> Result<Self, ReplayError> {
        Self::from_writer(File::create(trace_path(dir, trip))?)
    }
}

impl<W: Write> CsvTraceWriter<W> {
    pub fn from_writer(inner: W) -> Result<Self, ReplayError> {
        let mut writer = Writer::from_writer(inner);
        writer.write_record(HEADER)?;
        Ok(Self { writer, last_error: None })
    }

    /// Take the stored write error (if any).
    pub fn take_error(&mut self) -> Option<ReplayError> {
        self.last_error.take()
    }

    /// Flush and unwrap the inner writer.
    pub fn into_inner(self) -> Result<W, ReplayError> {
        self.writer
            .into_inner()
            .map_err(|e| ReplayError::Io(e.into_error()))
    }

    fn store_err<E: Into<ReplayError>>(&mut self, result: Result<(), E>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e.into());
            }
        }
    }
}

impl<W: Write> ReplayObserver for CsvTraceWriter<W> {
    fn on_step(&mut self, index: usize, reading: &Reading, outcome: &UpdateOutcome, phase: Phase) {
        let (distances, status) = match outcome {
            UpdateOutcome::Rejected(_) => (None, "rejected"),
            UpdateOutcome::Accepted { proximity, low_accuracy, .. } => {
                let status = if *low_accuracy { "low_accuracy" } else { "accepted" };
                (Some(proximity), status)
            }
        };
        let metric = |f: fn(&tad_detect::Proximity) -> f64| {
            distances.map_or_else(String::new, |p| format!("{:.1}", f(p)))
        };

        let result = self.writer.write_record(&[
            index.to_string(),
            format!("{:.8}", reading.position.lat),
            format!("{:.8}", reading.position.lon),
            reading.speed_mps.to_string(),
            reading.accuracy_m.to_string(),
            metric(|p| p.before_m),
            metric(|p| p.destination_m),
            metric(|p| p.radius_m),
            status.to_owned(),
            (phase.is_ready() as u8).to_string(),
            (phase.is_finished() as u8).to_string(),
        ]);
        self.store_err(result);
    }

    fn on_replay_end(&mut self, _trip: &TripId) {
        let result = self.writer.flush();
        self.store_err(result);
    }
}

/// Where [`CsvTraceWriter::create`] puts the trace for `trip`.
pub fn trace_path(dir: &Path, trip: &TripId) -> PathBuf {
    let name: String = trip
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{name}_trace.csv"))
}
