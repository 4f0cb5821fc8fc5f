//! Error types for shove-core

use crate::ActorId;
use thiserror::Error;

/// Core error type
///
/// Numeric and missing-capability paths never fail; these errors only come
/// from lookups that the caller asked to be strict.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    #[error("Actor {0} has no pushee capability")]
    NotAPushee(ActorId),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
