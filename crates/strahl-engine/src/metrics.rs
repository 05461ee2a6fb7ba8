//! Per-call tracking metrics.
//!
//! [`TrackMetrics`] is filled in by the tracking loop as it runs and
//! returned with the result.

/// Timing and loss counters of one tracking call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackMetrics {
    /// Wall-clock time from start to end, in microseconds.
    pub elapsed_us: u64,
    /// Number of element passes processed.
    pub elements_processed: u64,
    /// Number of particles lost on apertures.
    pub particles_lost: usize,
    /// Number of completed turns.
    pub turns: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = TrackMetrics::default();
        assert_eq!(m.elapsed_us, 0);
        assert_eq!(m.elements_processed, 0);
        assert_eq!(m.particles_lost, 0);
        assert_eq!(m.turns, 0);
    }
}
