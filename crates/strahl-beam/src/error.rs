//! Errors for beam construction and distribution generation.

use std::error::Error;
use std::fmt;

/// Invalid beam or distribution parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum BeamError {
    /// A beam must contain at least one particle.
    Empty,
    /// Coordinate and status arrays differ in length.
    LengthMismatch {
        /// Number of coordinate rows.
        coordinates: usize,
        /// Number of status entries.
        status: usize,
    },
    /// A distribution width is negative or not finite.
    InvalidSigma {
        /// Coordinate label.
        coordinate: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// Twiss parameters are not physical.
    InvalidTwiss {
        /// Plane label (`"x"` or `"y"`).
        plane: &'static str,
        /// What is wrong.
        reason: &'static str,
    },
}

impl fmt::Display for BeamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "beam has no particles"),
            Self::LengthMismatch {
                coordinates,
                status,
            } => write!(
                f,
                "{coordinates} coordinate rows but {status} status entries"
            ),
            Self::InvalidSigma { coordinate, value } => {
                write!(f, "sigma of {coordinate} must be finite and >= 0, got {value}")
            }
            Self::InvalidTwiss { plane, reason } => {
                write!(f, "invalid Twiss parameters in {plane}: {reason}")
            }
        }
    }
}

impl Error for BeamError {}
