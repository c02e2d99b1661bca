use tad_core::TripId;
use tad_detect::DetectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("recorded trip parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("replay configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error("trip {trip}: {what} index {index} out of range for {len} readings")]
    IndexOutOfRange {
        trip:  TripId,
        what:  &'static str,
        index: usize,
        len:   usize,
    },

    #[error("trip {trip}: no expected get-ready / pull-the-cord indices")]
    NoExpectation { trip: TripId },

    #[error("trip {trip}: get ready triggered too soon (reading {index}, expected {expected})")]
    PrematureReady {
        trip:     TripId,
        index:    usize,
        expected: usize,
    },

    #[error("trip {trip}: pull the cord triggered too soon (reading {index}, expected {expected})")]
    PrematureFinish {
        trip:     TripId,
        index:    usize,
        expected: usize,
    },

    #[error("trip {trip}: get ready had not fired by reading {expected}")]
    MissedReady { trip: TripId, expected: usize },

    #[error("trip {trip}: pull the cord had not fired by reading {expected}")]
    MissedFinish { trip: TripId, expected: usize },
}

pub type ReplayResult<T> = Result<T, ReplayError>;
