//! Test utilities and mock collaborators for strahl development.
//!
//! Provides a [`MockScattering`] material model with a fixed stopping
//! power, a [`RecordingObserver`] that logs every lifecycle call, and
//! lattice [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use strahl_beam::BeamView;
use strahl_compile::{LossModel, ScatteringModel, ScatteringOptions};
use strahl_core::{ElementIndex, PhysicsError, TurnIndex};
use strahl_obs::{Observer, ObserverConfig};

/// Mock implementation of [`ScatteringModel`].
///
/// Every known material removes `mev_per_cm` MeV per centimetre. The loss
/// model records its inputs: `moments = [thickness, energy, 0]`,
/// `dpp = ΔE / E`, and `loss` is zero unless `with_losses` is set, in
/// which case it is `0.01` per centimetre.
pub struct MockScattering {
    pub materials: Vec<(String, f64)>,
}

impl MockScattering {
    pub fn new() -> Self {
        Self {
            materials: vec![("graphite".into(), 3.0), ("beryllium".into(), 2.5)],
        }
    }

    fn rate(&self, material: &str) -> Result<f64, PhysicsError> {
        self.materials
            .iter()
            .find(|(m, _)| m == material)
            .map(|(_, r)| *r)
            .ok_or_else(|| PhysicsError::UnknownMaterial {
                material: material.to_string(),
            })
    }
}

impl Default for MockScattering {
    fn default() -> Self {
        Self::new()
    }
}

impl ScatteringModel for MockScattering {
    fn compute_loss_model(
        &self,
        material: &str,
        energy: f64,
        thickness: f64,
        options: &ScatteringOptions,
    ) -> Result<LossModel, PhysicsError> {
        let loss = self.rate(material)? * thickness;
        Ok(LossModel {
            moments: [thickness, energy, 0.0],
            dpp: if options.with_dpp { loss / energy } else { 0.0 },
            loss: if options.with_losses { 0.01 * thickness } else { 0.0 },
        })
    }

    fn residual_energy(
        &self,
        material: &str,
        energy: f64,
        thickness: f64,
    ) -> Result<f64, PhysicsError> {
        let residual = energy - self.rate(material)? * thickness;
        if residual <= 0.0 {
            return Err(PhysicsError::BeamStopped {
                material: material.to_string(),
                thickness,
            });
        }
        Ok(residual)
    }
}

/// One observer callback, as seen by a [`RecordingObserver`].
#[derive(Clone, Debug, PartialEq)]
pub enum ObserverEvent {
    Start { alive: usize },
    Element { turn: TurnIndex, element: ElementIndex, x: Vec<f64> },
    Turn { turn: TurnIndex, element: ElementIndex },
    End { turn: TurnIndex, element: ElementIndex, alive: usize },
}

/// Records every lifecycle call in order, with the horizontal positions
/// seen at each element.
pub struct RecordingObserver {
    pub config: ObserverConfig,
    pub events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    pub fn new(config: ObserverConfig) -> Self {
        Self {
            config,
            events: Vec::new(),
        }
    }
}

impl Observer for RecordingObserver {
    type Output = Vec<ObserverEvent>;

    fn config(&self) -> &ObserverConfig {
        &self.config
    }

    fn on_start(&mut self, beam: BeamView<'_>) {
        self.events.push(ObserverEvent::Start {
            alive: beam.alive_count(),
        });
    }

    fn on_element(&mut self, turn: TurnIndex, element: ElementIndex, beam: BeamView<'_>) {
        self.events.push(ObserverEvent::Element {
            turn,
            element,
            x: beam.coordinates().iter().map(|p| p[0]).collect(),
        });
    }

    fn on_turn(&mut self, turn: TurnIndex, element: ElementIndex, _beam: BeamView<'_>) {
        self.events.push(ObserverEvent::Turn { turn, element });
    }

    fn on_end(
        &mut self,
        turn: TurnIndex,
        element: ElementIndex,
        beam: BeamView<'_>,
    ) -> Vec<ObserverEvent> {
        self.events.push(ObserverEvent::End {
            turn,
            element,
            alive: beam.alive_count(),
        });
        std::mem::take(&mut self.events)
    }
}
