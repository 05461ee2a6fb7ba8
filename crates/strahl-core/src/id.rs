//! Strongly-typed indices for lattice positions and tracking turns.

use std::fmt;

/// Position of an element within a lattice, in beam travel order.
///
/// `ElementIndex(n)` is the n-th element of the resolved sequence and
/// the n-th row of the compiled record array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementIndex(pub usize);

impl fmt::Display for ElementIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ElementIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// Zero-based turn counter for multi-turn tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnIndex(pub u32);

impl TurnIndex {
    /// The turn after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TurnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for TurnIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_bare_number() {
        assert_eq!(ElementIndex(7).to_string(), "7");
        assert_eq!(TurnIndex(3).to_string(), "3");
    }

    #[test]
    fn turn_next_increments() {
        assert_eq!(TurnIndex(0).next(), TurnIndex(1));
    }
}
