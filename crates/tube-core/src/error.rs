//! Error types for tube-core

use crate::time::TubeTime;
use thiserror::Error;

/// Core error type
///
/// Broken internal invariants (a missing sentinel, a dangling link) are not
/// represented here: they are engine bugs and panic instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid time: {0} cannot be ordered on a timeline")]
    InvalidTime(TubeTime),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
