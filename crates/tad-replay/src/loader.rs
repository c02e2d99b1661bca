//! Recorded-trip CSV loader.
//!
//! # CSV format
//!
//! No header line.  The first row describes the trip, every following row is
//! one reading in recorded order.
//!
//! ```csv
//! tripId,destinationId,destLat,destLng,beforeStopId,beforeLat,beforeLng
//! seq,ready,finished,elapsedNanos,epochMillis,lat,lng,altitude,speed,bearing,accuracy,satellites,provider
//! ```
//!
//! ```csv
//! HART_5_1042,6497,28.06409593,-82.413900,6496,28.058700,-82.413900
//! 0,true,false,3500000000000,1426096800000,28.05878993,-82.413900,12.0,5.0,2.5,8.0,9,gps
//! 1,true,false,,1426096801000,28.05923959,-82.413900,12.1,5.0,2.5,8.0,9,gps
//! ```
//!
//! | Column          | Notes                                                  |
//! |-----------------|--------------------------------------------------------|
//! | `ready`, `finished` | `true`/`false`, `1`/`0`, or empty (= false); the first set row is the expected trigger |
//! | `elapsedNanos`  | monotonic device clock; empty when the device had none |
//! | `satellites`    | may be empty                                           |
//!
//! Readings are loaded as recorded, implausible values included: deciding
//! what to discard is the detector's job.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;

use tad_core::{GeoPoint, Reading, ReferenceStop, Timestamp, TripId};

use crate::record::{RecordedTrip, TripHeader};
use crate::{ReplayError, ReplayResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ReadingRecord {
    sequence_index: u32,
    ready_flag:     String,
    finished_flag:  String,
    elapsed_nanos:  Option<u64>,
    epoch_millis:   i64,
    lat:            f64,
    lng:            f64,
    altitude:       f64,
    speed:          f64,
    bearing:        f64,
    accuracy:       f64,
    satellites:     Option<u32>,
    provider:       String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a recorded trip from a CSV file.
pub fn load_trip_csv(path: &Path) -> ReplayResult<RecordedTrip> {
    let file = File::open(path)?;
    load_trip_reader(file)
}

/// Like [`load_trip_csv`] but accepts any `Read` source.
pub fn load_trip_reader<R: Read>(reader: R) -> ReplayResult<RecordedTrip> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);
    let mut records = csv_reader.records();

    let header = match records.next() {
        Some(row) => parse_header(&row?)?,
        None => {
            return Err(ReplayError::Parse {
                line:    1,
                message: "empty recording: missing trip header".into(),
            });
        }
    };

    let mut trip = RecordedTrip {
        header,
        readings:        Vec::new(),
        sequence:        Vec::new(),
        expected_ready:  None,
        expected_finish: None,
    };

    for result in records {
        let row = result?;
        let line = line_of(&row);
        let record: ReadingRecord = row.deserialize(None).map_err(|e| ReplayError::Parse {
            line,
            message: e.to_string(),
        })?;

        let index = trip.readings.len();
        if parse_flag(&record.ready_flag, line)? && trip.expected_ready.is_none() {
            trip.expected_ready = Some(index);
        }
        if parse_flag(&record.finished_flag, line)? && trip.expected_finish.is_none() {
            trip.expected_finish = Some(index);
        }

        trip.sequence.push(record.sequence_index);
        trip.readings.push(Reading {
            timestamp:   Timestamp::new(record.elapsed_nanos, record.epoch_millis),
            position:    GeoPoint::new(record.lat, record.lng),
            altitude_m:  record.altitude,
            speed_mps:   record.speed,
            bearing_deg: record.bearing,
            accuracy_m:  record.accuracy,
            satellites:  record.satellites.unwrap_or(0),
            provider:    record.provider,
        });
    }

    Ok(trip)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn line_of(row: &StringRecord) -> u64 {
    row.position().map_or(0, |p| p.line())
}

fn parse_header(row: &StringRecord) -> ReplayResult<TripHeader> {
    let line = line_of(row);
    if row.len() < 7 {
        return Err(ReplayError::Parse {
            line,
            message: format!("trip header has {} fields, expected 7", row.len()),
        });
    }

    let coord = |i: usize, name: &str| -> ReplayResult<f64> {
        row[i].parse::<f64>().map_err(|_| ReplayError::Parse {
            line,
            message: format!("invalid {name} {:?}", &row[i]),
        })
    };

    Ok(TripHeader {
        trip_id:     TripId::new(&row[0]),
        destination: ReferenceStop::new(&row[1], GeoPoint::new(coord(2, "destLat")?, coord(3, "destLng")?)),
        before:      ReferenceStop::new(&row[4], GeoPoint::new(coord(5, "beforeLat")?, coord(6, "beforeLng")?)),
    })
}

fn parse_flag(s: &str, line: u64) -> ReplayResult<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(ReplayError::Parse {
            line,
            message: format!("invalid alert flag {other:?}: expected true/false, 1/0, or empty"),
        }),
    }
}
