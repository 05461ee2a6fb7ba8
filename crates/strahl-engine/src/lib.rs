//! Tracking engine for strahl.
//!
//! Drives a [`Beam`](strahl_beam::Beam) through a
//! [`CompiledLattice`](strahl_compile::CompiledLattice) for a number of
//! turns, reporting to an [`Observer`](strahl_obs::Observer).
//!
//! - [`track`] runs one call to completion.
//! - [`Tracker`] exposes the same loop one element at a time, with an
//!   observable [`TrackState`] and cooperative cancellation between
//!   elements.
//! - [`track_batch`] tracks independent beams on scoped threads against
//!   one shared, read-only lattice.
//!
//! A tracking call is synchronous and holds no global state: everything
//! it mutates (particle buffers, status, observer) is owned by the call.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod buffer;
pub mod cancel;
pub mod config;
pub mod metrics;
pub mod tracker;

pub use batch::{track_batch, BatchConfig};
pub use buffer::PingPongBuffer;
pub use cancel::CancelToken;
pub use config::{ConfigError, TrackConfig};
pub use metrics::TrackMetrics;
pub use tracker::{track, TrackError, TrackOutcome, TrackState, Tracker};
