//! Loss-aware beam statistics.

use strahl_core::{Coord, Phase, PHASE_DIM};

use crate::beam::BeamView;

/// First and second moments of the live particles.
///
/// Lost particles are excluded. With no live particles every moment is
/// `0.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeamStatistics {
    /// Total number of rows.
    pub total: usize,
    /// Number of live particles.
    pub alive: usize,
    /// Mean of each coordinate.
    pub mean: Phase,
    /// Standard deviation of each coordinate.
    pub sigma: Phase,
    /// RMS emittance of the horizontal and vertical planes.
    pub emittance: [f64; 2],
}

impl BeamStatistics {
    /// Compute the statistics of a beam view.
    pub fn from_view(view: &BeamView<'_>) -> Self {
        let total = view.len();
        let alive = view.alive_count();
        let mut stats = Self {
            total,
            alive,
            mean: [0.0; PHASE_DIM],
            sigma: [0.0; PHASE_DIM],
            emittance: [0.0; 2],
        };
        if alive == 0 {
            return stats;
        }
        let n = alive as f64;

        for p in view.alive() {
            for (m, v) in stats.mean.iter_mut().zip(p) {
                *m += v;
            }
        }
        stats.mean.iter_mut().for_each(|m| *m /= n);

        // Central second moments: variances plus the two in-plane covariances.
        let mut var = [0.0; PHASE_DIM];
        let mut cov = [0.0; 2];
        for p in view.alive() {
            let mut d = [0.0; PHASE_DIM];
            for ((di, v), m) in d.iter_mut().zip(p).zip(&stats.mean) {
                *di = v - m;
            }
            for (acc, di) in var.iter_mut().zip(&d) {
                *acc += di * di;
            }
            cov[0] += d[Coord::X.index()] * d[Coord::Px.index()];
            cov[1] += d[Coord::Y.index()] * d[Coord::Py.index()];
        }
        for (s, v) in stats.sigma.iter_mut().zip(var) {
            *s = (v / n).sqrt();
        }
        let planes = [(Coord::X, Coord::Px), (Coord::Y, Coord::Py)];
        for (k, (q, p)) in planes.into_iter().enumerate() {
            let det = var[q.index()] / n * var[p.index()] / n - (cov[k] / n).powi(2);
            stats.emittance[k] = det.max(0.0).sqrt();
        }
        stats
    }

    /// Fraction of particles still alive.
    pub fn transmission(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.alive as f64 / self.total as f64
        }
    }
}
