//! Error types for shove-script

use thiserror::Error;

/// Tuning loading error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid value in profile {profile}: {field} = {value}")]
    InvalidValue {
        profile: String,
        field: String,
        value: f64,
    },

    #[error("Duplicate profile: {0}")]
    DuplicateProfile(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
