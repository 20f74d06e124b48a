//! Error types for the snowfall context.

use thiserror::Error;

/// Fatal conditions raised while starting a snowfall.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SnowfallError {
    #[error("no stage to draw on; snowfall was not started")]
    StageMissing,

    #[error("a steady flow needs at least {required} unique icons, found {found}")]
    TooFewImages { required: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, SnowfallError>;
