//! Observer protocol for strahl tracking.
//!
//! The tracking loop reports to an [`Observer`] at four points: once at
//! start, after selected elements, after each turn, and once at the end.
//! Which of these fire is explicit configuration ([`ObserverConfig`]),
//! read by the loop before each call.
//!
//! Four recorders are provided:
//!
//! - [`NullObserver`] records nothing.
//! - [`BeamObserver`] keeps owned snapshot copies of the beam.
//! - [`SummaryObserver`] keeps loss-aware statistics only.
//! - [`LossObserver`] keeps the transmission at each record point.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod observer;
pub mod recorders;

pub use config::ObserverConfig;
pub use observer::{NullObserver, Observer};
pub use recorders::{
    BeamObserver, BeamRecord, LossObserver, LossRecord, SummaryObserver, SummaryRecord,
};
