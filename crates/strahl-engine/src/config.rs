//! Tracking configuration, validation, and error types.
//!
//! [`TrackConfig`] is the input of every tracking call.
//! [`validate()`](TrackConfig::validate) checks it against the lattice
//! before the first element is processed; nothing is checked per element.

use std::error::Error;
use std::fmt;

use strahl_compile::CompiledLattice;
use strahl_core::ElementIndex;
use strahl_obs::ObserverConfig;
use strahl_propagators::{IntegratorOrder, IntegratorSettings, InvalidIntegratorOrder};

use crate::cancel::CancelToken;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`TrackConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The kicker integrator order is not 1, 2 or 4.
    InvalidIntegratorOrder {
        /// The rejected order.
        order: u8,
    },
    /// The kicker integrator step count is zero.
    ZeroIntegratorSteps,
    /// Zero turns requested.
    ZeroTurns,
    /// The compiled lattice has no elements.
    EmptyLattice,
    /// An observer allow-list names an element past the end of the lattice.
    ElementOutOfRange {
        /// The offending index.
        element: ElementIndex,
        /// Number of elements in the lattice.
        len: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIntegratorOrder { order } => {
                write!(f, "invalid integrator order {order}, expected 1, 2 or 4")
            }
            Self::ZeroIntegratorSteps => write!(f, "integrator_steps must be at least 1"),
            Self::ZeroTurns => write!(f, "turns must be at least 1"),
            Self::EmptyLattice => write!(f, "compiled lattice has no elements"),
            Self::ElementOutOfRange { element, len } => {
                write!(f, "observed element {} is out of range for {len} elements", element.0)
            }
        }
    }
}

impl Error for ConfigError {}

impl From<InvalidIntegratorOrder> for ConfigError {
    fn from(e: InvalidIntegratorOrder) -> Self {
        Self::InvalidIntegratorOrder { order: e.order }
    }
}

// ── TrackConfig ────────────────────────────────────────────────────

/// Configuration of one tracking call.
#[derive(Clone, Debug)]
pub struct TrackConfig {
    /// Number of passes through the lattice. Default: 1.
    pub turns: u32,
    /// Kicker integrator order: 1, 2 or 4. Default: 1.
    pub integrator_order: u8,
    /// Kicker integrator steps per element. Default: 1.
    pub integrator_steps: usize,
    /// Checked between elements; tracking stops with
    /// [`TrackError::Cancelled`](crate::TrackError::Cancelled) once set.
    pub cancel: Option<CancelToken>,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            turns: 1,
            integrator_order: 1,
            integrator_steps: 1,
            cancel: None,
        }
    }
}

impl TrackConfig {
    /// Builder: number of turns.
    pub fn with_turns(mut self, turns: u32) -> Self {
        self.turns = turns;
        self
    }

    /// Builder: kicker integrator order and steps.
    pub fn with_integrator(mut self, order: u8, steps: usize) -> Self {
        self.integrator_order = order;
        self.integrator_steps = steps;
        self
    }

    /// Builder: cancellation token.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The validated integrator settings.
    pub fn integrator(&self) -> Result<IntegratorSettings, ConfigError> {
        let order = IntegratorOrder::try_from(self.integrator_order)?;
        if self.integrator_steps == 0 {
            return Err(ConfigError::ZeroIntegratorSteps);
        }
        Ok(IntegratorSettings {
            order,
            steps: self.integrator_steps,
        })
    }

    /// Check the configuration against a lattice and an observer.
    pub fn validate(
        &self,
        lattice: &CompiledLattice,
        observer: &ObserverConfig,
    ) -> Result<(), ConfigError> {
        self.integrator()?;
        if self.turns == 0 {
            return Err(ConfigError::ZeroTurns);
        }
        if lattice.is_empty() {
            return Err(ConfigError::EmptyLattice);
        }
        if let Some(element) = observer.max_element() {
            if element.0 >= lattice.len() {
                return Err(ConfigError::ElementOutOfRange {
                    element,
                    len: lattice.len(),
                });
            }
        }
        Ok(())
    }
}
