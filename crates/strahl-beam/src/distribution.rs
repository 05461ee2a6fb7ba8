//! Seeded initial distributions.
//!
//! Every generator draws from a ChaCha8 stream seeded with a `u64`, so the
//! same parameters and seed give the same particles on every platform.
//! Normal deviates use the Box-Muller transform.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use strahl_core::{Coord, Phase, PHASE_DIM};

use crate::error::BeamError;

/// Courant-Snyder parameters and RMS emittance of one transverse plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwissParameters {
    /// Alpha.
    pub alpha: f64,
    /// Beta (m).
    pub beta: f64,
    /// RMS emittance (m·rad).
    pub emittance: f64,
}

impl TwissParameters {
    fn validate(&self, plane: &'static str) -> Result<(), BeamError> {
        if !self.alpha.is_finite() {
            return Err(BeamError::InvalidTwiss {
                plane,
                reason: "alpha must be finite",
            });
        }
        if !self.beta.is_finite() || self.beta <= 0.0 {
            return Err(BeamError::InvalidTwiss {
                plane,
                reason: "beta must be finite and positive",
            });
        }
        if !self.emittance.is_finite() || self.emittance < 0.0 {
            return Err(BeamError::InvalidTwiss {
                plane,
                reason: "emittance must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Correlated (position, angle) pair from two unit normal deviates.
    fn sample(&self, u1: f64, u2: f64) -> (f64, f64) {
        let q = (self.emittance * self.beta).sqrt() * u1;
        let p = (self.emittance / self.beta).sqrt() * (u2 - self.alpha * u1);
        (q, p)
    }
}

/// Generators of initial particle coordinates.
pub struct Distribution;

impl Distribution {
    /// `n` particles with independent normal coordinates of the given
    /// widths, centred on zero.
    pub fn gaussian(n: usize, sigma: Phase, seed: u64) -> Result<Vec<Phase>, BeamError> {
        if n == 0 {
            return Err(BeamError::Empty);
        }
        for (c, &s) in Coord::ALL.iter().zip(&sigma) {
            check_sigma(c.label(), s)?;
        }
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Ok((0..n)
            .map(|_| {
                let mut p = [0.0; PHASE_DIM];
                for (v, s) in p.iter_mut().zip(&sigma) {
                    *v = s * box_muller(&mut rng);
                }
                p
            })
            .collect())
    }

    /// `n` particles matched to the given Twiss parameters in each plane,
    /// with a normal momentum deviation of width `dpp_sigma`.
    pub fn twiss(
        n: usize,
        x: TwissParameters,
        y: TwissParameters,
        dpp_sigma: f64,
        seed: u64,
    ) -> Result<Vec<Phase>, BeamError> {
        if n == 0 {
            return Err(BeamError::Empty);
        }
        x.validate("x")?;
        y.validate("y")?;
        check_sigma(Coord::Dpp.label(), dpp_sigma)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Ok((0..n)
            .map(|_| {
                let (qx, px) = x.sample(box_muller(&mut rng), box_muller(&mut rng));
                let (qy, py) = y.sample(box_muller(&mut rng), box_muller(&mut rng));
                [qx, px, qy, py, dpp_sigma * box_muller(&mut rng)]
            })
            .collect())
    }
}

fn check_sigma(coordinate: &'static str, value: f64) -> Result<(), BeamError> {
    if !value.is_finite() || value < 0.0 {
        return Err(BeamError::InvalidSigma { coordinate, value });
    }
    Ok(())
}

fn box_muller(rng: &mut ChaCha8Rng) -> f64 {
    let u1: f64 = rng.random::<f64>().max(1e-300); // avoid ln(0)
    let u2: f64 = rng.random();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
