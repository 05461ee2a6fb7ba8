//! The tracking loop.
//!
//! A [`Tracker`] is one tracking call held open: it owns the particle
//! buffers, the observer and the prepared element maps, and borrows the
//! compiled lattice read-only. [`step()`](Tracker::step) processes one
//! element; [`run()`](Tracker::run) processes the rest and returns the
//! result.
//!
//! Per element: propagate every live particle into the staging buffer,
//! check the aperture on the staging buffer, swap buffers, then notify the
//! observer if that element is recorded. After the last element of a turn
//! the observer's turn hook fires; after the last turn, its end hook.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use strahl_beam::{Beam, BeamView, ParticleStatus};
use strahl_compile::CompiledLattice;
use strahl_core::{ElementIndex, Kinematics, TurnIndex};
use strahl_obs::Observer;
use strahl_propagators::{check_apertures, propagate, ElementMap, GlobalParameters};
use tracing::{debug, info, warn};

use crate::buffer::PingPongBuffer;
use crate::config::{ConfigError, TrackConfig};
use crate::metrics::TrackMetrics;

// ── TrackState ──────────────────────────────────────────────────

/// Where a [`Tracker`] is in its lattice walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackState {
    /// No element processed and the observer not yet started.
    NotStarted,
    /// Tracking in progress; `(turn, element)` is the next element to
    /// process.
    Running {
        /// Turn of the next element.
        turn: TurnIndex,
        /// Index of the next element.
        element: ElementIndex,
    },
    /// Every turn processed and the observer ended.
    Finished,
}

// ── TrackError ──────────────────────────────────────────────────

/// Errors from a tracking call.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackError {
    /// The configuration was rejected before tracking started.
    Config(ConfigError),
    /// The cancel token was set; `(turn, element)` was not processed.
    Cancelled {
        /// Turn of the unprocessed element.
        turn: TurnIndex,
        /// Index of the unprocessed element.
        element: ElementIndex,
    },
    /// [`Tracker::step()`] was called after the last element.
    AlreadyFinished,
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Cancelled { turn, element } => {
                write!(f, "tracking cancelled before element {} of turn {}", element.0, turn.0)
            }
            Self::AlreadyFinished => write!(f, "tracking already finished"),
        }
    }
}

impl Error for TrackError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for TrackError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ── TrackOutcome ────────────────────────────────────────────────

/// Result of a completed tracking call.
#[derive(Clone, Debug)]
pub struct TrackOutcome<T> {
    /// The final beam, lost rows included.
    pub beam: Beam,
    /// What the observer returned from its end hook.
    pub output: T,
    /// Counters for this call.
    pub metrics: TrackMetrics,
}

// ── Tracker ─────────────────────────────────────────────────────

/// One tracking call, advanced element by element.
///
/// # Example
///
/// ```ignore
/// let mut tracker = Tracker::new(&lattice, beam, observer, TrackConfig::default())?;
/// while tracker.step()? != TrackState::Finished {}
/// let outcome = tracker.into_outcome();
/// ```
pub struct Tracker<'l, O: Observer> {
    lattice: &'l CompiledLattice,
    maps: Vec<ElementMap>,
    kinematics: Kinematics,
    buffers: PingPongBuffer,
    status: Vec<ParticleStatus>,
    alive: usize,
    observer: O,
    config: TrackConfig,
    state: TrackState,
    metrics: TrackMetrics,
    started_at: Option<Instant>,
    output: Option<O::Output>,
}

impl<'l, O: Observer> Tracker<'l, O> {
    /// Validate `config` and prepare every element map.
    pub fn new(
        lattice: &'l CompiledLattice,
        beam: Beam,
        observer: O,
        config: TrackConfig,
    ) -> Result<Self, TrackError> {
        config.validate(lattice, observer.config())?;
        let settings = config.integrator()?;
        let (kinematics, coordinates, status) = beam.into_parts();
        let globals = GlobalParameters::from_kinematics(&kinematics);
        let maps = lattice
            .elements()
            .iter()
            .map(|e| ElementMap::build(e.kind(), &globals, &settings))
            .collect();
        let alive = status.iter().filter(|s| s.is_alive()).count();
        Ok(Self {
            lattice,
            maps,
            kinematics,
            buffers: PingPongBuffer::new(coordinates),
            status,
            alive,
            observer,
            config,
            state: TrackState::NotStarted,
            metrics: TrackMetrics::default(),
            started_at: None,
            output: None,
        })
    }

    /// Current state.
    pub fn state(&self) -> TrackState {
        self.state
    }

    /// Counters so far.
    pub fn metrics(&self) -> &TrackMetrics {
        &self.metrics
    }

    /// The beam as of the last processed element.
    pub fn view(&self) -> BeamView<'_> {
        BeamView::new(&self.kinematics, self.buffers.live(), &self.status)
    }

    /// Process the next element.
    ///
    /// Starts the observer on the first call and ends it after the last
    /// element of the last turn.
    ///
    /// # Errors
    ///
    /// [`TrackError::Cancelled`] if the cancel token is set (the element is
    /// not processed and a later call may resume), or
    /// [`TrackError::AlreadyFinished`].
    pub fn step(&mut self) -> Result<TrackState, TrackError> {
        let (turn, element) = match self.state {
            TrackState::Finished => return Err(TrackError::AlreadyFinished),
            TrackState::NotStarted => {
                self.start();
                (TurnIndex(0), ElementIndex(0))
            }
            TrackState::Running { turn, element } => (turn, element),
        };
        if self.config.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
            self.state = TrackState::Running { turn, element };
            return Err(TrackError::Cancelled { turn, element });
        }

        self.process(turn, element);

        let next = element.0 + 1;
        self.state = if next < self.lattice.len() {
            TrackState::Running {
                turn,
                element: ElementIndex(next),
            }
        } else {
            self.end_turn(turn, element);
            if turn.0 + 1 >= self.config.turns {
                self.finish(turn, element);
                TrackState::Finished
            } else {
                TrackState::Running {
                    turn: turn.next(),
                    element: ElementIndex(0),
                }
            }
        };
        Ok(self.state)
    }

    /// Process every remaining element and return the outcome.
    pub fn run(mut self) -> Result<TrackOutcome<O::Output>, TrackError> {
        while self.step()? != TrackState::Finished {}
        self.into_outcome().ok_or(TrackError::AlreadyFinished)
    }

    /// The outcome of a finished tracker; `None` if it has not finished.
    pub fn into_outcome(self) -> Option<TrackOutcome<O::Output>> {
        let output = self.output?;
        let metrics = self.metrics;
        let beam = take_beam(self.kinematics, self.buffers, self.status);
        Some(TrackOutcome {
            beam,
            output,
            metrics,
        })
    }

    /// Give up on tracking and return the beam as of the last processed
    /// element.
    pub fn into_beam(self) -> Beam {
        take_beam(self.kinematics, self.buffers, self.status)
    }

    fn start(&mut self) {
        self.started_at = Some(Instant::now());
        info!(
            lattice = self.lattice.name(),
            elements = self.lattice.len(),
            particles = self.status.len(),
            turns = self.config.turns,
            "tracking started"
        );
        let view = BeamView::new(&self.kinematics, self.buffers.live(), &self.status);
        self.observer.on_start(view);
    }

    fn process(&mut self, turn: TurnIndex, element: ElementIndex) {
        let i = element.0;
        let lattice = self.lattice;
        let compiled = &lattice.elements()[i];
        let misalignment = compiled.misalignment();
        {
            let (src, dst) = self.buffers.split();
            propagate(&self.maps[i], misalignment, src, dst, &self.status);
            let lost = check_apertures(
                compiled.aperture(),
                misalignment,
                dst,
                &mut self.status,
                turn,
                element,
            );
            if lost > 0 {
                self.metrics.particles_lost += lost;
                self.alive -= lost;
                if self.alive == 0 {
                    warn!(
                        element = compiled.name.as_str(),
                        turn = turn.0,
                        "every particle has been lost"
                    );
                }
            }
        }
        self.buffers.swap();
        self.metrics.elements_processed += 1;

        if self.observer.config().records_element(element) {
            let view = BeamView::new(&self.kinematics, self.buffers.live(), &self.status);
            self.observer.on_element(turn, element, view);
        }
    }

    fn end_turn(&mut self, turn: TurnIndex, element: ElementIndex) {
        self.metrics.turns += 1;
        debug!(turn = turn.0, alive = self.alive, "turn complete");
        if self.observer.config().turn_by_turn {
            let view = BeamView::new(&self.kinematics, self.buffers.live(), &self.status);
            self.observer.on_turn(turn, element, view);
        }
    }

    fn finish(&mut self, turn: TurnIndex, element: ElementIndex) {
        let view = BeamView::new(&self.kinematics, self.buffers.live(), &self.status);
        self.output = Some(self.observer.on_end(turn, element, view));
        self.metrics.elapsed_us = self
            .started_at
            .map_or(0, |t| t.elapsed().as_micros() as u64);
        info!(
            lattice = self.lattice.name(),
            alive = self.alive,
            lost = self.metrics.particles_lost,
            elapsed_us = self.metrics.elapsed_us,
            "tracking finished"
        );
    }
}

/// Track `beam` through `lattice` and return the outcome.
///
/// Equivalent to [`Tracker::new`] followed by [`Tracker::run`].
pub fn track<O: Observer>(
    lattice: &CompiledLattice,
    beam: Beam,
    observer: O,
    config: TrackConfig,
) -> Result<TrackOutcome<O::Output>, TrackError> {
    Tracker::new(lattice, beam, observer, config)?.run()
}

/// Move the live buffer back into a beam.
fn take_beam(
    kinematics: Kinematics,
    buffers: PingPongBuffer,
    status: Vec<ParticleStatus>,
) -> Beam {
    Beam::from_parts(kinematics, buffers.into_live(), status)
        .expect("buffers and status come from one validated beam")
}
