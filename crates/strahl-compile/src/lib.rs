//! Element parameterization compiler.
//!
//! [`compile`] turns a resolved [`Lattice`](strahl_lattice::Lattice) into a
//! [`CompiledLattice`]: one fixed-width
//! [`ElementRecord`](strahl_core::ElementRecord) per element, in lattice
//! order, with circuits substituted, apertures decoded, the reference
//! energy threaded through energy-loss elements and the magnetic rigidity
//! computed at each element entrance.
//!
//! Material physics is delegated to a [`ScatteringModel`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aperture;
pub mod compiled;
pub mod compiler;
pub mod context;
pub mod error;
pub mod scattering;

pub use compiled::{CompiledElement, CompiledLattice, Variable};
pub use compiler::{compile, compile_element};
pub use context::{CompileContext, ReferenceEnergy};
pub use error::CompileError;
pub use scattering::{LossModel, NoScattering, ScatteringModel, ScatteringOptions};
