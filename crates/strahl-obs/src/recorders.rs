//! Reference observers.

use indexmap::IndexMap;
use strahl_beam::{Beam, BeamStatistics, BeamView};
use strahl_core::{ElementIndex, TurnIndex};

use crate::config::ObserverConfig;
use crate::observer::Observer;

// ── Snapshots ───────────────────────────────────────────────────

/// Owned beam copies taken by a [`BeamObserver`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BeamRecord {
    /// The initial beam.
    pub start: Option<Beam>,
    /// Beam after each recorded element, in tracking order.
    pub elements: IndexMap<(TurnIndex, ElementIndex), Beam>,
    /// Beam at the end of each recorded turn.
    pub turns: IndexMap<TurnIndex, Beam>,
    /// The final beam.
    pub end: Option<Beam>,
}

impl BeamRecord {
    /// The snapshot after `element` in `turn`, if it was recorded.
    pub fn at(&self, turn: TurnIndex, element: ElementIndex) -> Option<&Beam> {
        self.elements.get(&(turn, element))
    }
}

/// Keeps an owned copy of the beam at every record point.
#[derive(Clone, Debug, Default)]
pub struct BeamObserver {
    config: ObserverConfig,
    record: BeamRecord,
}

impl BeamObserver {
    /// A beam observer with the given activation flags.
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            record: BeamRecord::default(),
        }
    }
}

impl Observer for BeamObserver {
    type Output = BeamRecord;

    fn config(&self) -> &ObserverConfig {
        &self.config
    }

    fn on_start(&mut self, beam: BeamView<'_>) {
        self.record.start = Some(beam.to_beam());
    }

    fn on_element(&mut self, turn: TurnIndex, element: ElementIndex, beam: BeamView<'_>) {
        self.record.elements.insert((turn, element), beam.to_beam());
    }

    fn on_turn(&mut self, turn: TurnIndex, _element: ElementIndex, beam: BeamView<'_>) {
        self.record.turns.insert(turn, beam.to_beam());
    }

    fn on_end(
        &mut self,
        _turn: TurnIndex,
        _element: ElementIndex,
        beam: BeamView<'_>,
    ) -> BeamRecord {
        self.record.end = Some(beam.to_beam());
        std::mem::take(&mut self.record)
    }
}

// ── Statistics ──────────────────────────────────────────────────

/// Statistics taken by a [`SummaryObserver`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryRecord {
    /// Statistics of the initial beam.
    pub start: Option<BeamStatistics>,
    /// Statistics after each recorded element, in tracking order.
    pub elements: Vec<(TurnIndex, ElementIndex, BeamStatistics)>,
    /// Statistics at the end of each recorded turn.
    pub turns: Vec<(TurnIndex, BeamStatistics)>,
    /// Statistics of the final beam.
    pub end: Option<BeamStatistics>,
}

/// Keeps loss-aware moments instead of full copies.
#[derive(Clone, Debug, Default)]
pub struct SummaryObserver {
    config: ObserverConfig,
    record: SummaryRecord,
}

impl SummaryObserver {
    /// A summary observer with the given activation flags.
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            record: SummaryRecord::default(),
        }
    }
}

impl Observer for SummaryObserver {
    type Output = SummaryRecord;

    fn config(&self) -> &ObserverConfig {
        &self.config
    }

    fn on_start(&mut self, beam: BeamView<'_>) {
        self.record.start = Some(BeamStatistics::from_view(&beam));
    }

    fn on_element(&mut self, turn: TurnIndex, element: ElementIndex, beam: BeamView<'_>) {
        self.record
            .elements
            .push((turn, element, BeamStatistics::from_view(&beam)));
    }

    fn on_turn(&mut self, turn: TurnIndex, _element: ElementIndex, beam: BeamView<'_>) {
        self.record.turns.push((turn, BeamStatistics::from_view(&beam)));
    }

    fn on_end(
        &mut self,
        _turn: TurnIndex,
        _element: ElementIndex,
        beam: BeamView<'_>,
    ) -> SummaryRecord {
        self.record.end = Some(BeamStatistics::from_view(&beam));
        std::mem::take(&mut self.record)
    }
}

// ── Transmission ────────────────────────────────────────────────

/// Transmission taken by a [`LossObserver`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LossRecord {
    /// Number of particles at start.
    pub initial: usize,
    /// Live fraction after each recorded element.
    pub elements: IndexMap<(TurnIndex, ElementIndex), f64>,
    /// Live fraction at the end of each recorded turn.
    pub turns: IndexMap<TurnIndex, f64>,
    /// Live fraction at the end.
    pub transmission: f64,
}

impl LossRecord {
    /// The recorded element with the largest drop in transmission from
    /// the previous record point, and that drop.
    pub fn worst_element(&self) -> Option<((TurnIndex, ElementIndex), f64)> {
        let mut previous = 1.0;
        let mut worst: Option<((TurnIndex, ElementIndex), f64)> = None;
        for (&key, &t) in &self.elements {
            let drop = previous - t;
            if drop > 0.0 && worst.is_none_or(|(_, w)| drop > w) {
                worst = Some((key, drop));
            }
            previous = t;
        }
        worst
    }
}

/// Tracks the live fraction along the lattice.
#[derive(Clone, Debug, Default)]
pub struct LossObserver {
    config: ObserverConfig,
    record: LossRecord,
}

impl LossObserver {
    /// A loss observer with the given activation flags.
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            record: LossRecord::default(),
        }
    }
}

fn transmission(beam: &BeamView<'_>) -> f64 {
    if beam.is_empty() {
        0.0
    } else {
        beam.alive_count() as f64 / beam.len() as f64
    }
}

impl Observer for LossObserver {
    type Output = LossRecord;

    fn config(&self) -> &ObserverConfig {
        &self.config
    }

    fn on_start(&mut self, beam: BeamView<'_>) {
        self.record.initial = beam.len();
    }

    fn on_element(&mut self, turn: TurnIndex, element: ElementIndex, beam: BeamView<'_>) {
        self.record
            .elements
            .insert((turn, element), transmission(&beam));
    }

    fn on_turn(&mut self, turn: TurnIndex, _element: ElementIndex, beam: BeamView<'_>) {
        self.record.turns.insert(turn, transmission(&beam));
    }

    fn on_end(
        &mut self,
        _turn: TurnIndex,
        _element: ElementIndex,
        beam: BeamView<'_>,
    ) -> LossRecord {
        self.record.transmission = transmission(&beam);
        std::mem::take(&mut self.record)
    }
}
