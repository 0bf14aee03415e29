//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeridianTypesError {
    /// A position array had fewer than two coordinates.
    #[error("position must have at least 2 coordinates, got {0}")]
    ShortPosition(usize),
}
