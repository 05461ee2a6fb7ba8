//! Core types for the strahl beam tracking engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the strahl workspace:
//! index newtypes, phase-space coordinates, the closed element catalog,
//! the canonical numeric element record, the element sum type used for
//! propagator dispatch, kinematic conversions, and shared error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod element;
pub mod error;
pub mod id;
pub mod kinematics;
pub mod phase;
pub mod record;

pub use catalog::{ApertureKind, ElementClass};
pub use element::{
    Aperture, BendParameters, ElementKind, LossParameters, Misalignment, MultipoleStrengths,
};
pub use error::{FieldNameError, PhysicsError};
pub use id::{ElementIndex, TurnIndex};
pub use kinematics::{
    energy_to_momentum, energy_to_rigidity, momentum_to_energy, Kinematics, PROTON_MASS_MEV,
};
pub use phase::{Coord, Phase, PHASE_DIM};
pub use record::{ElementRecord, Field, RECORD_WIDTH};
