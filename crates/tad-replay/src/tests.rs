//! Tests for tad-replay.

#[cfg(test)]
mod support {
    use crate::{load_trip_reader, RecordedTrip};

    /// Hand-built stand-in for the recorded "trip2" bus trip, in the recording
    /// format: 15 readings 1 s apart along a straight northbound leg.  Get
    /// ready is expected at reading 0, pull the cord at reading 14.  Reading
    /// 13 is a deliberately degraded fix inside the destination radius.
    pub const TRIP2_CSV: &str = include_str!("../fixtures/tad_trip2.csv");

    pub fn trip2() -> RecordedTrip {
        load_trip_reader(TRIP2_CSV.as_bytes()).unwrap()
    }

    pub const SMALL_CSV: &str = "\
T1,D,28.1,-82.4,B,28.0,-82.4
0,0,0,,1000,28.0,-82.4,0,0,0,5,,fused
1,1,0,,2000,28.001,-82.4,0,3.5,90,5,7,fused
2,TRUE,1,,3000,28.002,-82.4,0,3.5,90,5,7,fused
";
}

#[cfg(test)]
mod loader {
    use std::io::Write;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use crate::{load_trip_csv, load_trip_reader, Expectation, ReplayError};

    use super::support::{trip2, SMALL_CSV, TRIP2_CSV};

    #[test]
    fn trip2_header_and_rows() {
        let trip = trip2();
        assert_eq!(trip.trip_id().as_str(), "HART_5_1042");
        assert_eq!(trip.header.destination.id.as_str(), "6497");
        assert_eq!(trip.header.before.id.as_str(), "6496");
        assert!((trip.header.before.position.lat - 28.0587).abs() < 1e-9);
        assert_eq!(trip.len(), 15);
        assert_eq!(trip.sequence, (0..15).collect::<Vec<u32>>());
        assert_eq!(trip.expectation(), Some(Expectation { ready_index: 0, finish_index: 14 }));

        let r13 = &trip.readings[13];
        assert_eq!(r13.accuracy_m, 120.0);
        assert_eq!(r13.satellites, 3);
        assert_eq!(r13.provider, "gps");
        assert_eq!(r13.timestamp.elapsed_nanos, Some(3_513_000_000_000));
        assert_eq!(r13.timestamp.epoch_millis, 1_426_096_813_000);
    }

    #[test]
    fn flags_numeric_and_missing_columns() {
        let trip = load_trip_reader(SMALL_CSV.as_bytes()).unwrap();
        assert_eq!(trip.expected_ready, Some(1));
        assert_eq!(trip.expected_finish, Some(2));
        assert_eq!(trip.readings[0].timestamp.elapsed_nanos, None);
        assert_eq!(trip.readings[0].satellites, 0);
        assert_eq!(trip.readings[1].satellites, 7);
        assert_eq!(trip.readings[1].speed_mps, 3.5);
        assert_eq!(trip.readings[2].provider, "fused");
    }

    #[test]
    fn no_flags_means_no_expectation() {
        let csv = "T,D,28.1,-82.4,B,28.0,-82.4\n0,false,,,1000,28.0,-82.4,0,0,0,5,3,gps\n";
        let trip = load_trip_reader(csv.as_bytes()).unwrap();
        assert_eq!(trip.expected_ready, None);
        assert_eq!(trip.expectation(), None);
    }

    #[test]
    fn implausible_values_are_kept() {
        let csv = "T,D,28.1,-82.4,B,28.0,-82.4\n0,0,0,,1000,95.0,-82.4,0,-2,0,5,3,gps\n";
        let trip = load_trip_reader(csv.as_bytes()).unwrap();
        assert_eq!(trip.readings[0].speed_mps, -2.0);
        assert!(trip.readings[0].validate().is_err());
    }

    #[test]
    fn empty_input_is_parse_error() {
        assert!(matches!(load_trip_reader("".as_bytes()), Err(ReplayError::Parse { line: 1, .. })));
    }

    #[test]
    fn short_header_is_parse_error() {
        let err = load_trip_reader("T,D,28.1\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected 7"), "{err}");
    }

    #[test]
    fn bad_header_coordinate() {
        let err = load_trip_reader("T,D,north,-82.4,B,28.0,-82.4\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::Parse { ref message, .. } if message.contains("destLat")));
    }

    #[test]
    fn bad_flag_reports_line() {
        let csv = "T,D,28.1,-82.4,B,28.0,-82.4\n0,0,0,,1000,28.0,-82.4,0,0,0,5,3,gps\n1,maybe,0,,2000,28.0,-82.4,0,0,0,5,3,gps\n";
        let err = load_trip_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ReplayError::Parse { line: 3, .. }), "{err}");
    }

    #[test]
    fn non_numeric_row_is_parse_error() {
        let csv = "T,D,28.1,-82.4,B,28.0,-82.4\n0,0,0,,soon,28.0,-82.4,0,0,0,5,3,gps\n";
        assert!(matches!(load_trip_reader(csv.as_bytes()), Err(ReplayError::Parse { line: 2, .. })));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TRIP2_CSV.as_bytes()).unwrap();
        let trip = load_trip_csv(file.path()).unwrap();
        assert_eq!(trip.len(), 15);
        assert_eq!(crate::reading_delays(&trip.readings)[1], Duration::from_secs(1));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_trip_csv(&dir.path().join("nope.csv"));
        assert!(matches!(res, Err(ReplayError::Io(_))));
    }

    #[test]
    fn nearest_reading_to_before_stop() {
        let trip = trip2();
        assert_eq!(trip.nearest_reading(trip.header.before.position), Some(0));
        assert_eq!(trip.nearest_reading(trip.header.destination.position), Some(14));
    }
}

#[cfg(test)]
mod timing {
    use std::time::Duration;

    use tad_core::{GeoPoint, Reading, Timestamp};

    use crate::{load_trip_reader, reading_delays, SleepPacer};

    use super::support::SMALL_CSV;

    fn reading(nanos: Option<u64>, millis: i64) -> Reading {
        Reading::new(Timestamp::new(nanos, millis), GeoPoint::new(28.0, -82.4), 0.0, 5.0)
    }

    #[test]
    fn monotonic_clock_preferred() {
        let rs = [
            reading(Some(1_000_000_000), 5_000),
            reading(Some(1_250_000_000), 7_000),
            reading(Some(2_250_000_000), 7_000),
        ];
        assert_eq!(
            reading_delays(&rs),
            [Duration::ZERO, Duration::from_millis(250), Duration::from_secs(1)]
        );
    }

    #[test]
    fn epoch_millis_fallback() {
        let trip = load_trip_reader(SMALL_CSV.as_bytes()).unwrap();
        assert_eq!(
            reading_delays(&trip.readings),
            [Duration::ZERO, Duration::from_secs(1), Duration::from_secs(1)]
        );
    }

    #[test]
    fn partial_monotonic_clock_uses_millis_throughout() {
        let rs = [
            reading(Some(1_000_000_000), 5_000),
            reading(None, 5_400),
            reading(Some(9_000_000_000), 5_500),
        ];
        assert_eq!(
            reading_delays(&rs),
            [Duration::ZERO, Duration::from_millis(400), Duration::from_millis(100)]
        );
    }

    #[test]
    fn backwards_clock_clamps_to_zero() {
        let rs = [reading(None, 5_000), reading(None, 4_000)];
        assert_eq!(reading_delays(&rs), [Duration::ZERO, Duration::ZERO]);
        assert!(reading_delays(&[]).is_empty());
    }

    #[test]
    fn sleep_pacer_scales() {
        let pacer = SleepPacer::new(1_000);
        assert_eq!(pacer.scaled(Duration::from_secs(2)), Duration::from_millis(2));
        assert_eq!(SleepPacer::new(0).scaled(Duration::from_secs(1)), Duration::from_secs(1));
    }
}

#[cfg(test)]
mod trip2 {
    use std::time::Duration;

    use tad_detect::DetectorConfig;

    use crate::{
        replay, verify, verify_recorded, Expectation, InstantPacer, NoopReplayObserver, ReplayConfig,
        ReplayError,
    };

    use super::support::trip2;

    #[test]
    fn step_by_step_signals() {
        let trip = trip2();
        let mut detector = trip.detector(DetectorConfig::default()).unwrap();

        detector.update(&trip.readings[0]);
        assert!(detector.is_ready(), "expected get ready at reading 0");

        for (i, reading) in trip.readings.iter().enumerate().take(14).skip(1) {
            detector.update(reading);
            assert!(!detector.is_finished(), "pull the cord fired early at reading {i}");
        }

        detector.update(&trip.readings[14]);
        assert!(detector.is_ready());
        assert!(detector.is_finished());
        assert_eq!(detector.stats().low_accuracy, 1);
    }

    #[test]
    fn verifies_against_recorded_flags() {
        let trip = trip2();
        let report = verify_recorded(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver)
            .unwrap();
        assert_eq!(report.ready_at, Some(0));
        assert_eq!(report.finished_at, Some(14));
        // Reading 0 is delivered in both phases.
        assert_eq!(report.readings_fed, 16);
        assert_eq!(report.recorded, Duration::from_secs(14));
        assert_eq!(report.low_accuracy, 1);
        assert_eq!(report.verified, Some(Expectation { ready_index: 0, finish_index: 14 }));
    }

    #[test]
    fn repeated_final_reading_is_idempotent() {
        let trip = trip2();
        let mut detector = trip.detector(DetectorConfig::default()).unwrap();
        for reading in &trip.readings {
            detector.update(reading);
        }
        let last = trip.readings.last().unwrap();
        for _ in 0..2 {
            assert_eq!(detector.update(last).transition(), None);
            assert!(detector.is_ready() && detector.is_finished());
        }
    }

    #[test]
    fn plain_replay_reports_trigger_points() {
        let trip = trip2();
        let report = replay(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver).unwrap();
        assert_eq!(report.readings_fed, 15);
        assert_eq!(report.ready_at, Some(0));
        assert_eq!(report.finished_at, Some(14));
        assert_eq!(report.verified, None);
    }

    #[test]
    fn oversized_radius_fires_too_soon() {
        let trip = trip2();
        let config = ReplayConfig {
            detector: DetectorConfig { base_radius_m: 1_000.0, ..Default::default() },
            ..Default::default()
        };
        let err = verify_recorded(&trip, &config, &mut InstantPacer, &mut NoopReplayObserver).unwrap_err();
        assert!(
            matches!(err, ReplayError::PrematureFinish { index: 0, expected: 14, .. }),
            "{err}"
        );
    }

    #[test]
    fn later_expected_ready_fails() {
        let trip = trip2();
        let expected = Expectation { ready_index: 5, finish_index: 14 };
        let err = verify(&trip, expected, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver)
            .unwrap_err();
        assert!(matches!(err, ReplayError::PrematureReady { index: 0, expected: 5, .. }), "{err}");
        assert!(err.to_string().contains("too soon"));
    }

    #[test]
    fn earlier_expected_finish_is_missed() {
        let trip = trip2();
        let expected = Expectation { ready_index: 0, finish_index: 10 };
        let err = verify(&trip, expected, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver)
            .unwrap_err();
        assert!(matches!(err, ReplayError::MissedFinish { expected: 10, .. }), "{err}");
    }

    #[test]
    fn zero_radius_never_gets_ready() {
        let trip = trip2();
        let config = ReplayConfig {
            detector: DetectorConfig { base_radius_m: 0.0, lead_time_secs: 0.0, ..Default::default() },
            ..Default::default()
        };
        let expected = Expectation { ready_index: 3, finish_index: 14 };
        let err = verify(&trip, expected, &config, &mut InstantPacer, &mut NoopReplayObserver).unwrap_err();
        assert!(matches!(err, ReplayError::MissedReady { expected: 3, .. }), "{err}");
    }

    #[test]
    fn expectation_bounds_checked() {
        let trip = trip2();
        let cfg = ReplayConfig::default();

        let out_of_range = Expectation { ready_index: 0, finish_index: 15 };
        let err = verify(&trip, out_of_range, &cfg, &mut InstantPacer, &mut NoopReplayObserver).unwrap_err();
        assert!(matches!(err, ReplayError::IndexOutOfRange { index: 15, len: 15, .. }));

        let reversed = Expectation { ready_index: 9, finish_index: 4 };
        let err = verify(&trip, reversed, &cfg, &mut InstantPacer, &mut NoopReplayObserver).unwrap_err();
        assert!(matches!(err, ReplayError::Config(_)));
    }

    #[test]
    fn unflagged_trip_cannot_be_verified() {
        let mut trip = trip2();
        trip.expected_finish = None;
        let err = verify_recorded(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver)
            .unwrap_err();
        assert!(matches!(err, ReplayError::NoExpectation { .. }));
    }

    #[test]
    fn zero_speed_up_rejected() {
        let trip = trip2();
        let config = ReplayConfig { speed_up: 0, ..Default::default() };
        let err = replay(&trip, &config, &mut InstantPacer, &mut NoopReplayObserver).unwrap_err();
        assert!(matches!(err, ReplayError::Config(_)));
    }

    #[test]
    fn invalid_header_stop_is_detect_error() {
        let mut trip = trip2();
        trip.header.before.position.lat = 123.0;
        let err = replay(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver).unwrap_err();
        assert!(matches!(err, ReplayError::Detect(_)));
    }
}

#[cfg(test)]
mod synthetic {
    use tad_detect::DetectorConfig;

    use crate::{
        replay, verify, Expectation, InstantPacer, NoopReplayObserver, ReplayConfig, SyntheticTrip,
    };

    #[test]
    fn same_seed_same_trip() {
        let a = SyntheticTrip::default().build();
        let b = SyntheticTrip::default().build();
        assert_eq!(a, b);
        let c = SyntheticTrip { seed: 8, ..Default::default() }.build();
        assert_ne!(a.readings, c.readings);
    }

    #[test]
    fn nonsense_noise_widths_are_tolerated() {
        let clean = SyntheticTrip { jitter_m: 0.0, speed_noise_mps: 0.0, ..Default::default() }.build();
        let nan = SyntheticTrip { jitter_m: f64::NAN, speed_noise_mps: f64::INFINITY, ..Default::default() }.build();
        assert_eq!(nan.readings, clean.readings);

        let negative = SyntheticTrip { jitter_m: -3.0, speed_noise_mps: -0.5, ..Default::default() }.build();
        assert_eq!(negative, SyntheticTrip::default().build());
    }

    #[test]
    fn default_trip_fires_both_in_order() {
        let trip = SyntheticTrip::default().build();
        let report = replay(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver).unwrap();
        let ready = report.ready_at.expect("get ready should fire");
        let finished = report.finished_at.expect("pull the cord should fire");
        assert!(ready < finished);
    }

    /// Long run with periodic degraded fixes snapped onto the before stop:
    /// get ready must hold off for 2549 readings.
    #[test]
    fn long_prefix_with_degraded_fixes() {
        let synth = SyntheticTrip {
            trip_id:         "long-run".into(),
            approach_m:      25_635.0,
            leg_m:           800.0,
            overshoot_m:     200.0,
            cruise_mps:      10.0,
            jitter_m:        2.0,
            speed_noise_mps: 0.0,
            outlier_every:   Some(40),
            ..Default::default()
        };
        let trip = synth.build();
        assert!(trip.len() > 2_629);

        let expected = Expectation { ready_index: 2_549, finish_index: 2_629 };
        let report = verify(&trip, expected, &ReplayConfig::default(), &mut InstantPacer, &mut NoopReplayObserver)
            .unwrap();
        assert_eq!(report.ready_at, Some(2_549));
        assert_eq!(report.finished_at, Some(2_629));
        assert!(report.low_accuracy >= 60, "got {}", report.low_accuracy);
    }

    #[test]
    fn wall_clock_only_recording_replays_identically() {
        let with_clock = SyntheticTrip::default().build();
        let without_clock = SyntheticTrip { monotonic_clock: false, ..Default::default() }.build();
        assert!(without_clock.readings.iter().all(|r| r.timestamp.elapsed_nanos.is_none()));

        let cfg = ReplayConfig::default();
        let a = replay(&with_clock, &cfg, &mut InstantPacer, &mut NoopReplayObserver).unwrap();
        let b = replay(&without_clock, &cfg, &mut InstantPacer, &mut NoopReplayObserver).unwrap();
        assert_eq!((a.ready_at, a.finished_at), (b.ready_at, b.finished_at));
        assert_eq!(a.recorded, b.recorded);
    }

    #[test]
    fn faster_vehicle_warned_further_out() {
        let ready_distance = |cruise_mps: f64| {
            let trip = SyntheticTrip {
                cruise_mps,
                jitter_m: 0.0,
                speed_noise_mps: 0.0,
                ..Default::default()
            }
            .build();
            let config = ReplayConfig {
                detector: DetectorConfig { infer_missing_speed: false, ..Default::default() },
                ..Default::default()
            };
            let report = replay(&trip, &config, &mut InstantPacer, &mut NoopReplayObserver).unwrap();
            let index = report.ready_at.expect("get ready should fire");
            trip.readings[index].position.distance_m(trip.header.before.position)
        };

        let crawl = ready_distance(3.0);
        let highway = ready_distance(25.0);
        assert!(highway > crawl, "highway {highway} m vs crawl {crawl} m");
    }
}

#[cfg(test)]
mod trace {
    use tad_core::TripId;

    use crate::{trace_path, verify_recorded, CsvTraceWriter, InstantPacer, ReplayConfig};

    use super::support::trip2;

    #[test]
    fn one_row_per_fed_reading() {
        let trip = trip2();
        let mut writer = CsvTraceWriter::from_writer(Vec::new()).unwrap();
        verify_recorded(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut writer).unwrap();
        assert!(writer.take_error().is_none());

        let bytes = writer.into_inner().unwrap();
        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers[0], "index");
        assert_eq!(headers[8], "status");

        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 16);
        assert_eq!(&rows[0][0], "0");
        assert_eq!(&rows[0][9], "1"); // ready
        assert_eq!(&rows[1][0], "0"); // get-ready reading fed twice
        assert_eq!(&rows[14][0], "13");
        assert_eq!(&rows[14][8], "low_accuracy");
        assert_eq!(&rows[14][10], "0");
        assert_eq!(&rows[15][10], "1"); // finished
    }

    #[test]
    fn trace_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        let trip = trip2();
        let mut writer = CsvTraceWriter::create(dir.path(), trip.trip_id()).unwrap();
        verify_recorded(&trip, &ReplayConfig::default(), &mut InstantPacer, &mut writer).unwrap();
        assert!(writer.take_error().is_none());
        drop(writer);

        let path = dir.path().join("HART_5_1042_trace.csv");
        let mut rdr = csv::Reader::from_path(path).unwrap();
        assert_eq!(rdr.records().count(), 16);
    }

    #[test]
    fn trace_names_are_sanitised() {
        let dir = std::path::Path::new("/tmp/out");
        let path = trace_path(dir, &TripId::new("HART 5/1042"));
        assert_eq!(path, dir.join("HART_5_1042_trace.csv"));
    }
}

#[cfg(test)]
mod corpus {
    use crate::{replay_corpus, CorpusEntry, Expectation, ReplayConfig, ReplayError, SyntheticTrip};

    use super::support::trip2;

    #[test]
    fn results_in_input_order() {
        let mut failing = CorpusEntry::new(trip2());
        failing.expected = Some(Expectation { ready_index: 3, finish_index: 14 });

        let entries = vec![
            CorpusEntry::new(trip2()),
            failing,
            CorpusEntry::new(SyntheticTrip::default().build()),
        ];
        let results = replay_corpus(&entries, &ReplayConfig::default());
        assert_eq!(results.len(), 3);

        let first = results[0].as_ref().unwrap();
        assert!(first.verified.is_some());
        assert!(matches!(results[1], Err(ReplayError::PrematureReady { .. })));
        let third = results[2].as_ref().unwrap();
        assert!(third.verified.is_none());
        assert!(third.finished_at.is_some());
    }
}
