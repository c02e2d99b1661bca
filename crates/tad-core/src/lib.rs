//! `tad-core`: value types shared by the arrival detector and the replay
//! harness.
//!
//! This crate has no `tad-*` dependencies and only `thiserror` (plus optional
//! `serde`) from outside.
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`geo`]       | `GeoPoint`, haversine distance, coordinate validation   |
//! | [`ids`]       | `TripId`, `StopId`                                      |
//! | [`time`]      | `Timestamp` (monotonic nanos with epoch-millis fallback)|
//! | [`reading`]   | `Reading`, `ReadingError`                               |
//! | [`stop`]      | `ReferenceStop`                                         |
//! | [`error`]     | `TadError`, `TadResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod reading;
pub mod stop;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{TadError, TadResult};
pub use geo::GeoPoint;
pub use ids::{StopId, TripId};
pub use reading::{Reading, ReadingError};
pub use stop::ReferenceStop;
pub use time::Timestamp;
