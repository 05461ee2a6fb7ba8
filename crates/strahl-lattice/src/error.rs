//! Errors from lattice construction and lattice transforms.

use std::error::Error;
use std::fmt;

/// Two consecutive elements whose placements overlap.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlap {
    /// The upstream element, or `None` when the first element starts
    /// before the lattice origin.
    pub previous: Option<String>,
    /// The downstream element.
    pub next: String,
    /// The (negative) filler length that would be needed (m).
    pub length: f64,
}

/// Errors detected while building or transforming a [`Lattice`](crate::Lattice).
#[derive(Clone, Debug, PartialEq)]
pub enum LatticeError {
    /// No elements were supplied.
    EmptyLattice,
    /// Two elements share a name.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// A transform referenced an element that is not in the lattice.
    UnknownElement {
        /// The missing name.
        name: String,
    },
    /// Geometry resolution did not reach a fixed point.
    GeometryDivergence {
        /// Passes executed before giving up.
        passes: usize,
        /// Elements still changing in the last pass.
        unsettled: Vec<String>,
    },
    /// Drift insertion found overlapping elements.
    ///
    /// Lists every overlap so the whole lattice can be fixed in one go.
    NegativeDriftLength {
        /// Every offending pair.
        offenders: Vec<Overlap>,
    },
    /// Survey conversion requested but some elements have no survey point.
    MissingSurveyData {
        /// Elements without a survey point.
        names: Vec<String>,
    },
    /// Slice bounds are reversed.
    InvalidSlice {
        /// First element of the slice.
        start: String,
        /// Last element of the slice.
        stop: String,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLattice => write!(f, "lattice has no elements"),
            Self::DuplicateName { name } => write!(f, "duplicate element name '{name}'"),
            Self::UnknownElement { name } => write!(f, "no element named '{name}'"),
            Self::GeometryDivergence { passes, unsettled } => {
                write!(
                    f,
                    "geometry did not reach a fixed point after {passes} passes \
                     (still changing: {})",
                    unsettled.join(", ")
                )
            }
            Self::NegativeDriftLength { offenders } => {
                write!(f, "negative drift length between: ")?;
                for (i, o) in offenders.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match &o.previous {
                        Some(prev) => write!(f, "'{prev}' and '{}' ({:.6} m)", o.next, o.length)?,
                        None => write!(f, "origin and '{}' ({:.6} m)", o.next, o.length)?,
                    }
                }
                Ok(())
            }
            Self::MissingSurveyData { names } => {
                write!(f, "no survey data for: {}", names.join(", "))
            }
            Self::InvalidSlice { start, stop } => {
                write!(f, "slice start '{start}' comes after stop '{stop}'")
            }
        }
    }
}

impl Error for LatticeError {}
