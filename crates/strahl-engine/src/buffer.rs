//! Double-buffered particle coordinates.
//!
//! [`PingPongBuffer`] holds two coordinate arrays of equal length. One is
//! live (the latest fully propagated state); the other is staging. Each
//! element reads the live array, writes the staging array, and then the
//! roles swap:
//!
//! ```text
//! buffer_a: Vec<Phase>  ←─── live (even swaps) / staging (odd)
//! buffer_b: Vec<Phase>  ←─── staging (even swaps) / live (odd)
//! ```

use strahl_core::Phase;

/// Two coordinate arrays with alternating roles.
#[derive(Clone, Debug)]
pub struct PingPongBuffer {
    buffer_a: Vec<Phase>,
    buffer_b: Vec<Phase>,
    /// Which buffer is live (false = A live, true = B live).
    b_is_live: bool,
}

impl PingPongBuffer {
    /// Take ownership of `coordinates` as the live array.
    pub fn new(coordinates: Vec<Phase>) -> Self {
        let buffer_b = vec![[0.0; strahl_core::PHASE_DIM]; coordinates.len()];
        Self {
            buffer_a: coordinates,
            buffer_b,
            b_is_live: false,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.buffer_a.len()
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.buffer_a.is_empty()
    }

    /// The live array.
    pub fn live(&self) -> &[Phase] {
        if self.b_is_live {
            &self.buffer_b
        } else {
            &self.buffer_a
        }
    }

    /// The live array to read and the staging array to write.
    pub fn split(&mut self) -> (&[Phase], &mut [Phase]) {
        if self.b_is_live {
            (&self.buffer_b, &mut self.buffer_a)
        } else {
            (&self.buffer_a, &mut self.buffer_b)
        }
    }

    /// Make the staging array live.
    pub fn swap(&mut self) {
        self.b_is_live = !self.b_is_live;
    }

    /// Consume the buffer, returning the live array.
    pub fn into_live(self) -> Vec<Phase> {
        if self.b_is_live {
            self.buffer_b
        } else {
            self.buffer_a
        }
    }
}
