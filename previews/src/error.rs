//! Crate-level error type.
//!
//! Render failures are not errors here: they are reported per profile in a
//! `RenderReport`. What reaches this type ends the run.

use thiserror::Error;

use crate::config::ConfigError;
use crate::fits_header::HeaderError;
use crate::location::LocationError;
use crate::transfer::TransferError;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("Invalid glob pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, PreviewError>;
