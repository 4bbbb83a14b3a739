use std::fmt;

use crate::types::{MAX_RESOLUTION, Scalar};

/// Errors returned by geometry operations.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The sample resolution was not a positive number.
    InvalidResolution(Scalar),
    /// The sample resolution exceeded [`MAX_RESOLUTION`].
    ResolutionTooLarge(Scalar),
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidResolution(v) => {
                write!(f, "resolution must be a positive number, got {v}")
            }
            Self::ResolutionTooLarge(v) => {
                write!(f, "resolution {v} exceeds the maximum of {MAX_RESOLUTION}")
            }
        }
    }
}

impl std::error::Error for GeometryError {}
