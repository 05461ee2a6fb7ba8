//! Strahl: particle-beam tracking through accelerator lattices.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! strahl sub-crates. For most users, adding `strahl` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strahl::prelude::*;
//!
//! // A 2 m drift, a thin 1 mrad horizontal kicker, then a 1 m drift.
//! let elements = vec![
//!     ElementDescriptor::new("D1", "DRIFT").with_length(2.0).at_entry(0.0),
//!     ElementDescriptor::new("K", "HKICKER")
//!         .with_length(0.0)
//!         .with_field(Field::Kick, 0.001),
//!     ElementDescriptor::new("D2", "DRIFT").with_length(1.0),
//! ];
//! let lattice = Lattice::new("line", elements).unwrap();
//! assert_eq!(lattice.length(), 3.0);
//!
//! let ctx = CompileContext::new(ReferenceEnergy::KineticEnergy(230.0));
//! let compiled = compile(&lattice, &ctx, &NoScattering).unwrap();
//!
//! let beam = Beam::new(*compiled.reference(), vec![[0.0; 5]]).unwrap();
//! let out = track(&compiled, beam, NullObserver::new(), TrackConfig::default()).unwrap();
//!
//! let p = out.beam.coordinates()[0];
//! assert_eq!(p[Coord::Px.index()], 0.001);
//! assert!((p[Coord::X.index()] - 0.001).abs() < 1e-15);
//! assert_eq!(out.metrics.elements_processed, 3);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strahl-core` | Ids, element catalog, record layout, kinematics |
//! | [`lattice`] | `strahl-lattice` | Element descriptors, geometry resolution, transforms |
//! | [`compile`] | `strahl-compile` | Parameterization compiler and scattering collaborator |
//! | [`beam`] | `strahl-beam` | Particle arrays, distributions, statistics |
//! | [`propagators`] | `strahl-propagators` | Transfer matrices, kicks, aperture check |
//! | [`obs`] | `strahl-obs` | Observer trait and reference recorders |
//! | [`engine`] | `strahl-engine` | Tracking loop, cancellation, batch tracking |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, ids and physics conversions (`strahl-core`).
///
/// Contains the element catalog ([`types::ElementClass`]), the canonical
/// numeric record ([`types::ElementRecord`]) and [`types::Kinematics`].
pub use strahl_core as types;

/// Lattice descriptors and geometry (`strahl-lattice`).
///
/// Build a [`lattice::Lattice`] from [`lattice::ElementDescriptor`]s; drift
/// insertion, markers, slicing and concatenation are methods on it.
pub use strahl_lattice as lattice;

/// Element parameterization (`strahl-compile`).
///
/// [`compile::compile`] turns a resolved lattice into a
/// [`compile::CompiledLattice`] that is read-only during tracking.
pub use strahl_compile as compile;

/// Particle arrays and distributions (`strahl-beam`).
pub use strahl_beam as beam;

/// Element maps and the aperture check (`strahl-propagators`).
///
/// The tracking loop drives these; use them directly to propagate a single
/// element outside of [`engine::track`].
pub use strahl_propagators as propagators;

/// Observer protocol and recorders (`strahl-obs`).
pub use strahl_obs as obs;

/// Tracking engine (`strahl-engine`).
///
/// [`engine::track`] for a single call, [`engine::Tracker`] for
/// element-by-element stepping, [`engine::track_batch`] for independent
/// beams on worker threads.
pub use strahl_engine as engine;

/// Common imports for typical strahl usage.
///
/// ```rust
/// use strahl::prelude::*;
/// ```
///
/// This imports lattice construction, compilation, beams, observers and the
/// tracking entry points.
pub mod prelude {
    // Core types
    pub use strahl_core::{
        Aperture, ApertureKind, Coord, ElementClass, ElementIndex, ElementKind, Field,
        Kinematics, Phase, TurnIndex,
    };

    // Errors
    pub use strahl_beam::BeamError;
    pub use strahl_compile::CompileError;
    pub use strahl_core::PhysicsError;
    pub use strahl_engine::{ConfigError, TrackError};
    pub use strahl_lattice::LatticeError;

    // Lattice
    pub use strahl_lattice::{DriftOptions, ElementDescriptor, Lattice, LatticeOptions};

    // Compilation
    pub use strahl_compile::{
        compile, CompileContext, CompiledLattice, NoScattering, ReferenceEnergy,
        ScatteringModel, ScatteringOptions, Variable,
    };

    // Beam
    pub use strahl_beam::{Beam, BeamStatistics, BeamView, Distribution, ParticleStatus};

    // Observation
    pub use strahl_obs::{
        BeamObserver, LossObserver, NullObserver, Observer, ObserverConfig, SummaryObserver,
    };

    // Engine
    pub use strahl_engine::{
        track, track_batch, BatchConfig, CancelToken, TrackConfig, TrackMetrics, TrackOutcome,
        TrackState, Tracker,
    };
}
