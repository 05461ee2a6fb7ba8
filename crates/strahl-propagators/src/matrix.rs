//! Linear transfer matrices over `(x, px, y, py, dpp)`.
//!
//! Standard first-order optics. Every body matrix is the identity at zero
//! length; edge and rotation matrices are the identity at zero angle.

use strahl_core::{BendParameters, Phase, PHASE_DIM};

/// A 5×5 linear map acting on one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransferMatrix(pub [[f64; PHASE_DIM]; PHASE_DIM]);

impl Default for TransferMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl TransferMatrix {
    /// The identity map.
    pub fn identity() -> Self {
        let mut m = [[0.0; PHASE_DIM]; PHASE_DIM];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self(m)
    }

    /// The map that applies `self` first and `next` second (`next · self`).
    pub fn then(&self, next: &TransferMatrix) -> TransferMatrix {
        let mut out = [[0.0; PHASE_DIM]; PHASE_DIM];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (0..PHASE_DIM).map(|k| next.0[i][k] * self.0[k][j]).sum();
            }
        }
        TransferMatrix(out)
    }

    /// Apply to one particle.
    #[inline]
    pub fn apply(&self, p: &Phase) -> Phase {
        let mut out = [0.0; PHASE_DIM];
        for (o, row) in out.iter_mut().zip(&self.0) {
            *o = row.iter().zip(p).map(|(m, v)| m * v).sum();
        }
        out
    }

    /// Field-free drift of length `l`.
    pub fn drift(l: f64) -> Self {
        let mut m = Self::identity();
        m.0[0][1] = l;
        m.0[2][3] = l;
        m
    }

    /// Quadrupole of length `l` and normalized gradient `k1`.
    ///
    /// Positive `k1` focuses horizontally; `k1 = 0` is a drift.
    pub fn quadrupole(l: f64, k1: f64) -> Self {
        let mut m = Self::identity();
        set_block(&mut m, 0, focusing(k1, l));
        set_block(&mut m, 2, focusing(-k1, l));
        m
    }

    /// Sector bend body with entrance and exit edge focusing.
    pub fn sbend(b: &BendParameters) -> Self {
        if b.length == 0.0 {
            return Self::identity();
        }
        let h = b.angle / b.length;
        let entry = Self::edge(h, b.e1, b.hgap, b.fint);
        let exit = Self::edge(h, b.e2, b.hgap, b.fint);
        entry.then(&Self::sbend_body(b.length, h, b.k1)).then(&exit)
    }

    /// Rectangular bend: a sector bend with edge angles increased by half
    /// the bend angle and the chord length converted to arc length.
    pub fn rbend(b: &BendParameters) -> Self {
        if b.length == 0.0 {
            return Self::identity();
        }
        let half = b.angle / 2.0;
        let arc = if half == 0.0 {
            b.length
        } else {
            b.length * half / half.sin()
        };
        Self::sbend(&BendParameters {
            length: arc,
            e1: b.e1 + half,
            e2: b.e2 + half,
            ..*b
        })
    }

    /// Body of a combined-function sector bend of curvature `h`.
    fn sbend_body(l: f64, h: f64, k1: f64) -> Self {
        let kx = h * h + k1;
        let (c, s, cp, sp) = focusing(kx, l);
        let mut m = Self::identity();
        set_block(&mut m, 0, (c, s, cp, sp));
        set_block(&mut m, 2, focusing(-k1, l));
        let (d, dp) = if kx == 0.0 {
            (h * l * l / 2.0, h * l)
        } else {
            (h * (1.0 - c) / kx, h * s)
        };
        m.0[0][4] = d;
        m.0[1][4] = dp;
        m
    }

    /// Thin dipole edge of curvature `h` and pole-face angle `e`, with the
    /// fringe-field correction of gap `hgap` and integral `fint`.
    pub fn edge(h: f64, e: f64, hgap: f64, fint: f64) -> Self {
        let mut m = Self::identity();
        if h == 0.0 {
            return m;
        }
        let psi = 2.0 * fint * hgap * h * (1.0 + e.sin().powi(2)) / e.cos();
        m.0[1][0] = h * e.tan();
        m.0[3][2] = -h * (e - psi).tan();
        m
    }

    /// Rotation of the transverse plane by `angle` about the beam axis.
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::identity();
        for (q, p) in [(0, 2), (1, 3)] {
            m.0[q][q] = c;
            m.0[q][p] = s;
            m.0[p][q] = -s;
            m.0[p][p] = c;
        }
        m
    }
}

/// `(C, S, C', S')` of Hill's equation with constant focusing `k` over
/// length `l`.
fn focusing(k: f64, l: f64) -> (f64, f64, f64, f64) {
    if k > 0.0 {
        let w = k.sqrt();
        let (sn, cs) = (w * l).sin_cos();
        (cs, sn / w, -w * sn, cs)
    } else if k < 0.0 {
        let w = (-k).sqrt();
        let (sh, ch) = ((w * l).sinh(), (w * l).cosh());
        (ch, sh / w, w * sh, ch)
    } else {
        (1.0, l, 0.0, 1.0)
    }
}

fn set_block(m: &mut TransferMatrix, at: usize, (c, s, cp, sp): (f64, f64, f64, f64)) {
    m.0[at][at] = c;
    m.0[at][at + 1] = s;
    m.0[at + 1][at] = cp;
    m.0[at + 1][at + 1] = sp;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn det2(m: &TransferMatrix, at: usize) -> f64 {
        m.0[at][at] * m.0[at + 1][at + 1] - m.0[at][at + 1] * m.0[at + 1][at]
    }

    fn bend(length: f64, angle: f64) -> BendParameters {
        BendParameters {
            length,
            angle,
            ..BendParameters::default()
        }
    }

    #[test]
    fn zero_length_bodies_are_identity() {
        let id = TransferMatrix::identity();
        assert_eq!(TransferMatrix::drift(0.0), id);
        assert_eq!(TransferMatrix::quadrupole(0.0, 3.0), id);
        assert_eq!(TransferMatrix::quadrupole(0.0, -3.0), id);
        assert_eq!(TransferMatrix::sbend(&bend(0.0, 0.3)), id);
        assert_eq!(TransferMatrix::rbend(&bend(0.0, 0.3)), id);
        assert_eq!(TransferMatrix::rotation(0.0), id);
    }

    #[test]
    fn drift_moves_position_by_angle() {
        let p = TransferMatrix::drift(2.0).apply(&[0.1, 0.01, -0.2, 0.02, 0.0]);
        assert!((p[0] - 0.12).abs() < 1e-15);
        assert!((p[2] - (-0.16)).abs() < 1e-15);
    }

    #[test]
    fn quadrupole_blocks_are_symplectic() {
        for k1 in [2.0, -2.0, 0.0] {
            let m = TransferMatrix::quadrupole(0.7, k1);
            assert!((det2(&m, 0) - 1.0).abs() < 1e-12);
            assert!((det2(&m, 2) - 1.0).abs() < 1e-12);
        }
        let m = TransferMatrix::quadrupole(0.7, 2.0);
        // Focusing in x means defocusing in y.
        assert!(m.0[1][0] < 0.0 && m.0[3][2] > 0.0);
    }

    #[test]
    fn sector_bend_has_dispersion() {
        let m = TransferMatrix::sbend(&bend(1.0, 0.2));
        let h: f64 = 0.2;
        assert!((m.0[0][4] - (1.0 - h.cos()) / h).abs() < 1e-12);
        assert!((m.0[1][4] - h.sin()).abs() < 1e-12);
        assert!((det2(&m, 0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rbend_edges_cancel_horizontal_focusing_change() {
        let r = TransferMatrix::rbend(&bend(1.0, 0.2));
        assert!((det2(&r, 0) - 1.0).abs() < 1e-12);
        assert!((det2(&r, 2) - 1.0).abs() < 1e-12);
        assert!(r.0[3][2] != 0.0);
    }

    #[test]
    fn composition_order() {
        let a = TransferMatrix::drift(1.0);
        let b = TransferMatrix::quadrupole(0.0, 0.0).then(&TransferMatrix::rotation(0.5));
        let p = [0.1, 0.2, 0.3, 0.4, 0.0];
        let stepwise = b.apply(&a.apply(&p));
        let composed = a.then(&b).apply(&p);
        for (x, y) in stepwise.iter().zip(composed) {
            assert!((x - y).abs() < 1e-15);
        }
    }

    #[test]
    fn rotation_by_quarter_turn_swaps_planes() {
        let p = TransferMatrix::rotation(std::f64::consts::FRAC_PI_2).apply(&[1.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(p[0].abs() < 1e-15);
        assert!((p[2] + 1.0).abs() < 1e-15);
    }
}
