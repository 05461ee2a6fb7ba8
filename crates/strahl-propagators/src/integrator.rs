//! Split drift/kick integrators for dipole kickers.
//!
//! A kicker of length `L` and total deflection `θ` is split into `n`
//! steps, each a sequence of drifts and kicks whose drift lengths sum to
//! `L/n` and whose kicks sum to `θ/n`:
//!
//! - order 1: drift, kick
//! - order 2: half drift, kick, half drift
//! - order 4: the Yoshida composition of three order-2 steps
//!
//! Elements no longer than [`THIN_LENGTH`] are integrated in a single
//! step as half drift, kick, half drift, which makes the result
//! independent of the order.

use strahl_core::Phase;

use crate::error::InvalidIntegratorOrder;
use crate::kick::drift;

/// Elements at most this long (m) are integrated as thin.
pub const THIN_LENGTH: f64 = 1e-6;

/// Integrator order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegratorOrder {
    /// Drift then kick.
    #[default]
    First,
    /// Leapfrog.
    Second,
    /// Yoshida fourth order.
    Fourth,
}

impl IntegratorOrder {
    /// The numeric order.
    pub const fn order(self) -> u8 {
        match self {
            IntegratorOrder::First => 1,
            IntegratorOrder::Second => 2,
            IntegratorOrder::Fourth => 4,
        }
    }
}

impl TryFrom<u8> for IntegratorOrder {
    type Error = InvalidIntegratorOrder;

    fn try_from(order: u8) -> Result<Self, Self::Error> {
        match order {
            1 => Ok(IntegratorOrder::First),
            2 => Ok(IntegratorOrder::Second),
            4 => Ok(IntegratorOrder::Fourth),
            _ => Err(InvalidIntegratorOrder { order }),
        }
    }
}

/// Order and step count used for kickers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegratorSettings {
    /// Integrator order.
    pub order: IntegratorOrder,
    /// Steps per element. Zero is treated as one.
    pub steps: usize,
}

impl Default for IntegratorSettings {
    fn default() -> Self {
        Self {
            order: IntegratorOrder::First,
            steps: 1,
        }
    }
}

/// One drift or kick of an integrator step, as a fraction of the step's
/// length or deflection.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Stage {
    Drift(f64),
    Kick(f64),
}

fn yoshida() -> [Stage; 7] {
    let cbrt2 = 2f64.powf(1.0 / 3.0);
    let w1 = 1.0 / (2.0 - cbrt2);
    let w0 = -cbrt2 / (2.0 - cbrt2);
    [
        Stage::Drift(w1 / 2.0),
        Stage::Kick(w1),
        Stage::Drift((w0 + w1) / 2.0),
        Stage::Kick(w0),
        Stage::Drift((w0 + w1) / 2.0),
        Stage::Kick(w1),
        Stage::Drift(w1 / 2.0),
    ]
}

fn stages(order: IntegratorOrder) -> Vec<Stage> {
    match order {
        IntegratorOrder::First => vec![Stage::Drift(1.0), Stage::Kick(1.0)],
        IntegratorOrder::Second => vec![Stage::Drift(0.5), Stage::Kick(1.0), Stage::Drift(0.5)],
        IntegratorOrder::Fourth => yoshida().to_vec(),
    }
}

/// A kicker prepared for repeated application.
#[derive(Clone, Debug, PartialEq)]
pub struct KickerIntegrator {
    /// Coordinate receiving the deflection.
    axis: usize,
    /// Flattened drift lengths and kicks for the whole element.
    sequence: Vec<Stage>,
}

impl KickerIntegrator {
    /// Prepare a kicker of `length` deflecting coordinate `axis` by `kick`.
    pub fn new(length: f64, kick: f64, axis: usize, settings: &IntegratorSettings) -> Self {
        let (order_stages, steps) = if length <= THIN_LENGTH {
            (stages(IntegratorOrder::Second), 1)
        } else {
            (stages(settings.order), settings.steps.max(1))
        };
        let (h, k) = (length / steps as f64, kick / steps as f64);
        let step = order_stages.iter().map(|s| match *s {
            Stage::Drift(c) => Stage::Drift(c * h),
            Stage::Kick(d) => Stage::Kick(d * k),
        });
        let sequence = std::iter::repeat_n(step, steps).flatten().collect();
        Self { axis, sequence }
    }

    /// Integrate one particle through the kicker.
    pub fn apply(&self, p: &mut Phase) {
        for stage in &self.sequence {
            match *stage {
                Stage::Drift(l) => drift(p, l),
                Stage::Kick(k) => p[self.axis] += k,
            }
        }
    }
}
