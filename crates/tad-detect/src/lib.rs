//! `tad-detect`: arrival detection for destination reminders.
//!
//! One [`ArrivalDetector`] is created per navigated trip with the two stops
//! that bound its final leg.  Every positioning reading is pushed through
//! [`ArrivalDetector::update`]; two latched signals come out:
//!
//! | Signal        | Fires when                                             |
//! |---------------|--------------------------------------------------------|
//! | `is_ready`    | within the adaptive radius of the before stop          |
//! | `is_finished` | within the adaptive radius of the destination, after `is_ready` |
//!
//! The radius grows with speed (see [`config`]) and readings whose accuracy
//! exceeds the configured ceiling never fire an alert on their own.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`detector`]  | `ArrivalDetector`, `UpdateOutcome`, `Proximity`, `DetectorStats` |
//! | [`config`]    | `DetectorConfig`, adaptive radius                         |
//! | [`phase`]     | `Phase` (`AwaitingReady → Ready → Finished`)              |
//! | [`signals`]   | `AlertSignals`: lock-free read handle for other threads  |
//! | [`observer`]  | `ArrivalObserver`, `NoopObserver`, `ChannelObserver`      |
//! | [`error`]     | `DetectError`, `DetectResult<T>`                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tad_core::{GeoPoint, ReferenceStop};
//! use tad_detect::{ArrivalDetector, DetectorConfig};
//!
//! let mut detector = ArrivalDetector::new(
//!     "trip-42",
//!     "6497",
//!     ReferenceStop::new("6496", GeoPoint::new(28.0613, -82.4132)),
//!     ReferenceStop::new("6497", GeoPoint::new(28.0646, -82.4131)),
//!     DetectorConfig::default(),
//! )?;
//! for reading in readings {
//!     detector.update(&reading);
//!     if detector.is_finished() {
//!         break;
//!     }
//! }
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod observer;
pub mod phase;
pub mod signals;


pub use config::DetectorConfig;
pub use detector::{ArrivalDetector, DetectorStats, Proximity, UpdateOutcome};
pub use error::{DetectError, DetectResult};
pub use observer::{AlertEvent, ArrivalObserver, ChannelObserver, NoopObserver};
pub use phase::Phase;
pub use signals::AlertSignals;
