//! Compilation errors.

use std::error::Error;
use std::fmt;

use strahl_core::PhysicsError;

/// Errors raised while compiling or adjusting a lattice.
#[derive(Clone, Debug, PartialEq)]
pub enum CompileError {
    /// An aperture literal is not one or two comma-separated numbers.
    InvalidApertureSpec {
        /// Offending element.
        element: String,
        /// The literal as written.
        value: String,
    },
    /// A degrader has no material.
    MissingMaterial {
        /// Offending element.
        element: String,
    },
    /// The scattering model failed for an element.
    Physics {
        /// Offending element.
        element: String,
        /// Underlying failure.
        source: PhysicsError,
    },
    /// The configured reference energy or momentum is unusable.
    InvalidReference(PhysicsError),
    /// An adjustment or allow-list names an element not in the lattice.
    UnknownElement {
        /// The missing name.
        name: String,
    },
    /// An adjustment targets a field that cannot be set numerically.
    FixedField {
        /// The field name.
        field: String,
    },
    /// Adjustment variables and values differ in length.
    AdjustmentMismatch {
        /// Number of variables.
        variables: usize,
        /// Number of values.
        values: usize,
    },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidApertureSpec { element, value } => {
                write!(f, "invalid aperture '{value}' on element '{element}'")
            }
            Self::MissingMaterial { element } => {
                write!(f, "degrader '{element}' has no material")
            }
            Self::Physics { element, source } => {
                write!(f, "physics model failed for element '{element}': {source}")
            }
            Self::InvalidReference(e) => write!(f, "invalid reference energy: {e}"),
            Self::UnknownElement { name } => write!(f, "no element named '{name}'"),
            Self::FixedField { field } => write!(f, "field {field} cannot be adjusted"),
            Self::AdjustmentMismatch { variables, values } => {
                write!(f, "{variables} variables but {values} values")
            }
        }
    }
}

impl Error for CompileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Physics { source, .. } => Some(source),
            Self::InvalidReference(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physics_error_is_chained() {
        let e = CompileError::Physics {
            element: "DEG".into(),
            source: PhysicsError::UnknownMaterial {
                material: "unobtainium".into(),
            },
        };
        assert!(e.to_string().contains("DEG"));
        assert!(e.source().unwrap().to_string().contains("unobtainium"));
    }
}
