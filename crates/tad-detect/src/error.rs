use tad_core::TadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DetectError {
    #[error("detector configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] TadError),
}

pub type DetectResult<T> = Result<T, DetectError>;
