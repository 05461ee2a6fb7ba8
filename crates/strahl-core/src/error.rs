//! Error types shared across the strahl workspace.
//!
//! Subsystem-specific errors (lattice construction, compilation, tracking
//! configuration) live in their own crates and wrap these where needed.

use std::error::Error;
use std::fmt;

/// Errors from kinematic conversions and from the scattering-physics
/// collaborator.
#[derive(Clone, Debug, PartialEq)]
pub enum PhysicsError {
    /// Kinetic energy is NaN, infinite, zero or negative.
    InvalidEnergy {
        /// The rejected value (MeV).
        value: f64,
    },
    /// Momentum is NaN, infinite, zero or negative.
    InvalidMomentum {
        /// The rejected value (MeV/c).
        value: f64,
    },
    /// Rest mass is NaN, infinite or negative.
    InvalidMass {
        /// The rejected value (MeV/c²).
        value: f64,
    },
    /// The scattering model does not know the material.
    UnknownMaterial {
        /// Material name as written in the lattice.
        material: String,
    },
    /// The beam stops inside the material.
    BeamStopped {
        /// Material name.
        material: String,
        /// Thickness traversed (cm).
        thickness: f64,
    },
    /// Any other failure reported by the physics collaborator.
    Model {
        /// Human-readable description.
        reason: String,
    },
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnergy { value } => {
                write!(f, "kinetic energy must be finite and positive, got {value}")
            }
            Self::InvalidMomentum { value } => {
                write!(f, "momentum must be finite and positive, got {value}")
            }
            Self::InvalidMass { value } => {
                write!(f, "rest mass must be finite and non-negative, got {value}")
            }
            Self::UnknownMaterial { material } => write!(f, "unknown material '{material}'"),
            Self::BeamStopped {
                material,
                thickness,
            } => write!(f, "beam stops in {thickness} cm of '{material}'"),
            Self::Model { reason } => write!(f, "physics model failed: {reason}"),
        }
    }
}

impl Error for PhysicsError {}

/// A string did not name any canonical record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldNameError {
    /// The unrecognised name.
    pub name: String,
}

impl fmt::Display for FieldNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record field '{}'", self.name)
    }
}

impl Error for FieldNameError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_value() {
        let e = PhysicsError::UnknownMaterial {
            material: "unobtainium".into(),
        };
        assert_eq!(e.to_string(), "unknown material 'unobtainium'");
        let e = FieldNameError { name: "FOO".into() };
        assert!(e.to_string().contains("FOO"));
    }
}
