//! Element maps and the per-element propagation step.

use strahl_beam::ParticleStatus;
use strahl_core::{Coord, ElementKind, Kinematics, Misalignment, MultipoleStrengths, Phase};

use crate::integrator::{IntegratorSettings, KickerIntegrator};
use crate::kick::{self, integrated, integrated_all};
use crate::matrix::TransferMatrix;

/// Physical parameters shared by every element of a tracking call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalParameters {
    /// Relativistic beta of the reference particle.
    pub beta: f64,
}

impl GlobalParameters {
    /// Global parameters of a reference particle.
    pub fn from_kinematics(reference: &Kinematics) -> Self {
        Self {
            beta: reference.beta(),
        }
    }
}

/// The particle map of one element, prepared once and applied to every
/// live particle.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementMap {
    /// Coordinates pass through unchanged.
    Identity,
    /// Linear map.
    Matrix(TransferMatrix),
    /// Thin multipole kick between two half drifts.
    Thin {
        /// Element length (m).
        length: f64,
        /// Integrated strengths.
        kl: MultipoleStrengths,
    },
    /// Split drift/kick kicker.
    Kicker(KickerIntegrator),
}

impl ElementMap {
    /// Build the map of one element.
    ///
    /// The 5-D maps do not depend on the global parameters yet; they are
    /// accepted so that every builder has the same inputs.
    pub fn build(
        kind: &ElementKind,
        _globals: &GlobalParameters,
        settings: &IntegratorSettings,
    ) -> Self {
        match *kind {
            ElementKind::Drift { length } | ElementKind::Collimator { length } => {
                ElementMap::Matrix(TransferMatrix::drift(length))
            }
            ElementKind::Quadrupole { length, k1 } => {
                ElementMap::Matrix(TransferMatrix::quadrupole(length, k1))
            }
            ElementKind::SBend(ref b) => ElementMap::Matrix(TransferMatrix::sbend(b)),
            ElementKind::RBend(ref b) => ElementMap::Matrix(TransferMatrix::rbend(b)),
            ElementKind::Rotation { angle } => ElementMap::Matrix(TransferMatrix::rotation(angle)),
            ElementKind::Sextupole { length, k2 } => thin(length, MultipoleStrengths {
                k2: integrated(k2, length),
                ..MultipoleStrengths::default()
            }),
            ElementKind::Octupole { length, k3 } => thin(length, MultipoleStrengths {
                k3: integrated(k3, length),
                ..MultipoleStrengths::default()
            }),
            ElementKind::Decapole { length, k4 } => thin(length, MultipoleStrengths {
                k4: integrated(k4, length),
                ..MultipoleStrengths::default()
            }),
            ElementKind::Multipole { length, ref strengths } => {
                thin(length, integrated_all(strengths, length))
            }
            ElementKind::HKicker { length, kick } => ElementMap::Kicker(KickerIntegrator::new(
                length,
                kick,
                Coord::Px.index(),
                settings,
            )),
            ElementKind::VKicker { length, kick } => ElementMap::Kicker(KickerIntegrator::new(
                length,
                kick,
                Coord::Py.index(),
                settings,
            )),
            ElementKind::Degrader { .. }
            | ElementKind::Scatterer { .. }
            | ElementKind::Marker
            | ElementKind::Unknown => ElementMap::Identity,
        }
    }

    /// Whether the map leaves every particle unchanged.
    pub fn is_identity(&self) -> bool {
        matches!(self, ElementMap::Identity)
    }

    /// Apply the map to one particle in the element frame.
    #[inline]
    pub fn apply(&self, p: &mut Phase) {
        match self {
            ElementMap::Identity => {}
            ElementMap::Matrix(m) => *p = m.apply(p),
            ElementMap::Thin { length, kl } => {
                kick::drift(p, length / 2.0);
                kick::multipole(p, kl);
                kick::drift(p, length / 2.0);
            }
            ElementMap::Kicker(k) => k.apply(p),
        }
    }
}

fn thin(length: f64, kl: MultipoleStrengths) -> ElementMap {
    ElementMap::Thin { length, kl }
}

/// Propagate every particle of `src` through `map` into `dst`.
///
/// Live particles are shifted into the frame of an element offset by
/// `misalignment`, mapped, and shifted back. Lost rows are copied
/// unchanged.
///
/// # Panics
///
/// Panics if the three slices differ in length.
pub fn propagate(
    map: &ElementMap,
    misalignment: &Misalignment,
    src: &[Phase],
    dst: &mut [Phase],
    status: &[ParticleStatus],
) {
    assert_eq!(src.len(), dst.len(), "propagate: buffer length mismatch");
    assert_eq!(src.len(), status.len(), "propagate: status length mismatch");
    if map.is_identity() {
        dst.copy_from_slice(src);
        return;
    }
    let (x, y) = (Coord::X.index(), Coord::Y.index());
    let shifted = !misalignment.is_zero();
    for ((out, p), s) in dst.iter_mut().zip(src).zip(status) {
        *out = *p;
        if !s.is_alive() {
            continue;
        }
        if shifted {
            out[x] -= misalignment.dx;
            out[y] -= misalignment.dy;
        }
        map.apply(out);
        if shifted {
            out[x] += misalignment.dx;
            out[y] += misalignment.dy;
        }
    }
}
