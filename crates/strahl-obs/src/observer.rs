//! The [`Observer`] trait.

use strahl_beam::BeamView;
use strahl_core::{ElementIndex, TurnIndex};

use crate::config::ObserverConfig;

/// Receives the beam at the record points of one tracking call.
///
/// # Contract
///
/// - The tracking loop calls `on_start` once, then `on_element` and
///   `on_turn` as gated by [`config`](Observer::config), then `on_end`
///   once.
/// - Every [`BeamView`] reflects the fully propagated and aperture-checked
///   state at that point. Views are borrowed; observers that keep data
///   must copy it.
/// - An observer instance serves a single tracking call.
///
/// # Examples
///
/// An observer counting live particles after each turn:
///
/// ```
/// use strahl_beam::BeamView;
/// use strahl_core::{ElementIndex, TurnIndex};
/// use strahl_obs::{Observer, ObserverConfig};
///
/// struct AliveCounter {
///     config: ObserverConfig,
///     counts: Vec<usize>,
/// }
///
/// impl Observer for AliveCounter {
///     type Output = Vec<usize>;
///
///     fn config(&self) -> &ObserverConfig { &self.config }
///
///     fn on_turn(&mut self, _turn: TurnIndex, _element: ElementIndex, beam: BeamView<'_>) {
///         self.counts.push(beam.alive_count());
///     }
///
///     fn on_end(&mut self, _turn: TurnIndex, _element: ElementIndex, _beam: BeamView<'_>) -> Vec<usize> {
///         std::mem::take(&mut self.counts)
///     }
/// }
///
/// let obs = AliveCounter { config: ObserverConfig::quiet().with_turn_by_turn(true), counts: vec![] };
/// assert!(obs.config().turn_by_turn);
/// ```
pub trait Observer {
    /// What the observer returns when tracking ends.
    type Output;

    /// Activation flags. Read by the tracking loop, not by the observer.
    fn config(&self) -> &ObserverConfig;

    /// The initial beam, before the first element.
    fn on_start(&mut self, _beam: BeamView<'_>) {}

    /// The beam after `element` in `turn`.
    fn on_element(&mut self, _turn: TurnIndex, _element: ElementIndex, _beam: BeamView<'_>) {}

    /// The beam after the last element of `turn`.
    fn on_turn(&mut self, _turn: TurnIndex, _element: ElementIndex, _beam: BeamView<'_>) {}

    /// The final beam; returns the summarized result.
    ///
    /// `turn` and `element` are those of the last element processed.
    fn on_end(
        &mut self,
        turn: TurnIndex,
        element: ElementIndex,
        beam: BeamView<'_>,
    ) -> Self::Output;
}

/// An observer that records nothing.
#[derive(Clone, Debug, Default)]
pub struct NullObserver {
    config: ObserverConfig,
}

impl NullObserver {
    /// A new null observer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for NullObserver {
    type Output = ();

    fn config(&self) -> &ObserverConfig {
        &self.config
    }

    fn on_end(&mut self, _turn: TurnIndex, _element: ElementIndex, _beam: BeamView<'_>) {}
}
