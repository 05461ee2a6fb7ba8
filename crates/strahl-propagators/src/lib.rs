//! Per-element particle maps for the strahl tracking engine.
//!
//! Every element category maps to one [`ElementMap`], built once per
//! element from its [`ElementKind`](strahl_core::ElementKind) and applied
//! to every live particle:
//!
//! - **Matrix** categories (drift, collimator, quadrupole, bends, rotation)
//!   use a 5×5 [`TransferMatrix`].
//! - **Kick** categories (sextupole to multipole) use a thin kick between
//!   two half drifts; kickers use a split drift/kick [`integrator`] of
//!   order 1, 2 or 4.
//! - Everything else passes particles through unchanged.
//!
//! Maps hold no state besides their parameters; [`propagate`] writes into
//! a separate destination buffer and copies lost rows unchanged.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aperture;
pub mod error;
pub mod integrator;
pub mod kick;
pub mod map;
pub mod matrix;

pub use aperture::{check_apertures, is_inside};
pub use error::InvalidIntegratorOrder;
pub use integrator::{IntegratorOrder, IntegratorSettings, KickerIntegrator, THIN_LENGTH};
pub use map::{propagate, ElementMap, GlobalParameters};
pub use matrix::TransferMatrix;
