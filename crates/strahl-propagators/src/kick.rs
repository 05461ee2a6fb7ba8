//! Thin multipole kicks.
//!
//! Strengths are integrated (`Kn·L`, or `Kn` for a zero-length element)
//! and the kick is scaled by `1/(1+δ)`.

use strahl_core::{Coord, MultipoleStrengths, Phase};

const X: usize = Coord::X.index();
const PX: usize = Coord::Px.index();
const Y: usize = Coord::Y.index();
const PY: usize = Coord::Py.index();
const DPP: usize = Coord::Dpp.index();

/// Integrated strength of a multipole component.
pub fn integrated(k: f64, length: f64) -> f64 {
    if length == 0.0 {
        k
    } else {
        k * length
    }
}

/// Integrated strengths of every component of an element.
pub fn integrated_all(s: &MultipoleStrengths, length: f64) -> MultipoleStrengths {
    MultipoleStrengths {
        k1: integrated(s.k1, length),
        k2: integrated(s.k2, length),
        k3: integrated(s.k3, length),
        k4: integrated(s.k4, length),
    }
}

/// Apply a thin kick with integrated strengths `kl` to one particle.
pub fn multipole(p: &mut Phase, kl: &MultipoleStrengths) {
    let (x, y) = (p[X], p[Y]);
    let scale = 1.0 / (1.0 + p[DPP]);
    let mut dpx = 0.0;
    let mut dpy = 0.0;

    if kl.k1 != 0.0 {
        dpx -= kl.k1 * x;
        dpy += kl.k1 * y;
    }
    if kl.k2 != 0.0 {
        dpx -= kl.k2 / 2.0 * (x * x - y * y);
        dpy += kl.k2 * x * y;
    }
    if kl.k3 != 0.0 {
        dpx -= kl.k3 / 6.0 * (x * x * x - 3.0 * x * y * y);
        dpy += kl.k3 / 6.0 * (3.0 * x * x * y - y * y * y);
    }
    if kl.k4 != 0.0 {
        let (x2, y2) = (x * x, y * y);
        dpx -= kl.k4 / 24.0 * (x2 * x2 - 6.0 * x2 * y2 + y2 * y2);
        dpy += kl.k4 / 24.0 * (4.0 * x2 * x * y - 4.0 * x * y2 * y);
    }

    p[PX] += dpx * scale;
    p[PY] += dpy * scale;
}

/// Linear drift of length `l` applied in place.
#[inline]
pub fn drift(p: &mut Phase, l: f64) {
    p[X] += l * p[PX];
    p[Y] += l * p[PY];
}
