//! Shared error type.
//!
//! Downstream crates define their own error enums and wrap `TadError` as one
//! variant via `#[from]`.  Implausible readings are not errors at this level:
//! they are reported as [`ReadingError`][crate::ReadingError] and discarded
//! by the detector.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TadError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `tad-core`.
pub type TadResult<T> = Result<T, TadError>;
