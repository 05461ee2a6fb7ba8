//! Lattice descriptors, geometry resolution and lattice transforms.
//!
//! A [`Lattice`] is an ordered, name-keyed sequence of
//! [`ElementDescriptor`]s whose placement fields (`AT_ENTRY`, `AT_CENTER`,
//! `AT_EXIT`, `LENGTH`, `ORBIT_LENGTH`) have been resolved to a fixed point
//! by [`geometry::resolve`]. Survey-derived input goes through
//! [`survey`] first.
//!
//! Transforms ([`Lattice::add_drifts`], [`Lattice::add_markers`],
//! [`Lattice::to_thin`], [`Lattice::slice`], [`Lattice::concatenate`])
//! produce new resolved lattices.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod lattice;
pub mod survey;
mod transform;

pub use descriptor::{ApertureValue, ElementDescriptor, Geometry, SurveyPoint};
pub use error::{LatticeError, Overlap};
pub use geometry::{resolve, resolve_with, ResolveReport};
pub use lattice::{Lattice, LatticeOptions};
pub use transform::DriftOptions;
