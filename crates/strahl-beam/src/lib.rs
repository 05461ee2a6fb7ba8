//! Particle arrays for the strahl tracking engine.
//!
//! A [`Beam`] is a fixed-size set of particles in 5-D phase space
//! (`x`, `px`, `y`, `py`, `dpp`) plus a per-particle [`ParticleStatus`].
//! Particles lost on an aperture keep their row; their status records
//! where they were lost and their coordinates stay frozen from then on.
//!
//! [`Distribution`] generates seeded, reproducible initial beams;
//! [`BeamStatistics`] summarizes the surviving particles.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod beam;
pub mod distribution;
pub mod error;
pub mod statistics;

pub use beam::{Beam, BeamView, ParticleStatus};
pub use distribution::{Distribution, TwissParameters};
pub use error::BeamError;
pub use statistics::BeamStatistics;
