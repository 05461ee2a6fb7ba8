//! Propagator errors.

use std::error::Error;
use std::fmt;

/// An integrator order other than 1, 2 or 4 was requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidIntegratorOrder {
    /// The rejected order.
    pub order: u8,
}

impl fmt::Display for InvalidIntegratorOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid integrator order {}, expected 1, 2 or 4", self.order)
    }
}

impl Error for InvalidIntegratorOrder {}
