//! `tad-replay`: deterministic replay of recorded trips through the arrival
//! detector.
//!
//! The harness only feeds ordered readings into a
//! [`tad_detect::ArrivalDetector`] and watches the two alert signals; it has
//! no influence on the detector's decisions.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`record`]    | `RecordedTrip`, `TripHeader`, `Expectation`                |
//! | [`loader`]    | `load_trip_csv`, `load_trip_reader`                        |
//! | [`timing`]    | `reading_delays`, `Pacer`, `SleepPacer`, `InstantPacer`    |
//! | [`driver`]    | `replay`, `verify`, `verify_recorded`, `ReplayConfig`, `ReplayReport`, `ReplayObserver` |
//! | [`trace`]     | `CsvTraceWriter`: per-reading CSV trace                   |
//! | [`synth`]     | `SyntheticTrip`: seeded synthetic recordings              |
//! | [`corpus`]    | `replay_corpus` over many trips (parallel with `parallel`) |
//! | [`error`]     | `ReplayError`, `ReplayResult<T>`                           |
//!
//! # Verification procedure
//!
//! ```text
//! feed 0..=R  : get ready must not fire before R, must have fired at R,
//!                pull the cord must not have fired
//! feed R..=F  : (R is delivered twice) pull the cord must not fire
//!                before F and must have fired at F
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `replay_corpus` runs trips on Rayon's thread pool.     |
//! | `serde`    | Serde derives on `ReplayConfig` and `Expectation`.     |

pub mod corpus;
pub mod driver;
pub mod error;
pub mod loader;
pub mod record;
pub mod synth;
pub mod timing;
pub mod trace;

#[cfg(test)]
mod tests;

pub use corpus::{replay_corpus, CorpusEntry};
pub use driver::{
    replay, verify, verify_recorded, NoopReplayObserver, ReplayConfig, ReplayObserver, ReplayReport,
};
pub use error::{ReplayError, ReplayResult};
pub use loader::{load_trip_csv, load_trip_reader};
pub use record::{Expectation, RecordedTrip, TripHeader};
pub use synth::SyntheticTrip;
pub use timing::{reading_delays, InstantPacer, Pacer, SleepPacer};
pub use trace::{trace_path, CsvTraceWriter};
