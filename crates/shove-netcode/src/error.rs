//! Error types for shove-netcode

use thiserror::Error;

/// Netcode error type
#[derive(Debug, Error)]
pub enum Error {
    /// Segment encoding or decoding failed
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Bytes left over after the last segment
    #[error("{0} trailing bytes after target data")]
    TrailingBytes(usize),

    /// Segments not laid out as direction then optional strength
    #[error("Invalid target data layout with {0} segments")]
    InvalidLayout(usize),

    /// Target data without a direction segment
    #[error("Target data has no direction segment")]
    MissingPrimarySegment,

    /// Push event without an instigator or target
    #[error("Push event is missing its pushee or pusher")]
    MissingActor,

    /// Session used before an avatar was set
    #[error("No avatar set for push scanning")]
    NoAvatar,

    #[error(transparent)]
    Core(#[from] shove_core::Error),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
