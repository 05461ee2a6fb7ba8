//! Typed view of a compiled element for propagator dispatch.
//!
//! [`ElementKind`] is decoded once from an [`ElementRecord`] and carries
//! only the parameters its propagator needs. Dispatch is a `match` over
//! the variant, so adding a category forces every propagator table to
//! handle it.

use crate::catalog::{ApertureKind, ElementClass};
use crate::record::{ElementRecord, Field};

/// Parameters shared by sector and rectangular bends.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BendParameters {
    /// Length (m). Arc length for sector bends, chord for rectangular bends.
    pub length: f64,
    /// Bend angle (rad).
    pub angle: f64,
    /// Combined-function gradient (1/m²).
    pub k1: f64,
    /// Entrance edge angle (rad).
    pub e1: f64,
    /// Exit edge angle (rad).
    pub e2: f64,
    /// Entrance pole-face curvature (1/m).
    pub h1: f64,
    /// Exit pole-face curvature (1/m).
    pub h2: f64,
    /// Full gap height (m).
    pub hgap: f64,
    /// Fringe-field integral.
    pub fint: f64,
}

/// Strengths of a thin multipole kick.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MultipoleStrengths {
    /// Quadrupole component (1/m²).
    pub k1: f64,
    /// Sextupole component (1/m³).
    pub k2: f64,
    /// Octupole component (1/m⁴).
    pub k3: f64,
    /// Decapole component (1/m⁵).
    pub k4: f64,
}

/// Shape parameters of the degrader energy-loss model.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct LossParameters {
    /// Fermi-Eyges moments A0, A1, A2.
    pub moments: [f64; 3],
    /// Momentum spread added by the material.
    pub dpp: f64,
    /// Fraction of particles lost in the material.
    pub loss: f64,
}

/// An element decoded into its category with the parameters it uses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementKind {
    /// Field-free drift.
    Drift {
        /// Length (m).
        length: f64,
    },
    /// Drift with an aperture.
    Collimator {
        /// Length (m).
        length: f64,
    },
    /// Quadrupole.
    Quadrupole {
        /// Length (m).
        length: f64,
        /// Normalized gradient (1/m²); positive focuses horizontally.
        k1: f64,
    },
    /// Sector bend.
    SBend(BendParameters),
    /// Rectangular bend.
    RBend(BendParameters),
    /// Rotation of the transverse plane.
    Rotation {
        /// Rotation angle (rad).
        angle: f64,
    },
    /// Sextupole.
    Sextupole {
        /// Length (m).
        length: f64,
        /// Normalized strength (1/m³).
        k2: f64,
    },
    /// Octupole.
    Octupole {
        /// Length (m).
        length: f64,
        /// Normalized strength (1/m⁴).
        k3: f64,
    },
    /// Decapole.
    Decapole {
        /// Length (m).
        length: f64,
        /// Normalized strength (1/m⁵).
        k4: f64,
    },
    /// Combined thin multipole.
    Multipole {
        /// Length (m).
        length: f64,
        /// Component strengths.
        strengths: MultipoleStrengths,
    },
    /// Horizontal kicker.
    HKicker {
        /// Length (m).
        length: f64,
        /// Deflection (rad).
        kick: f64,
    },
    /// Vertical kicker.
    VKicker {
        /// Length (m).
        length: f64,
        /// Deflection (rad).
        kick: f64,
    },
    /// Degrader; carries its loss model but tracks as a pass-through.
    Degrader {
        /// Length (m).
        length: f64,
        /// Energy-loss shape parameters.
        loss: LossParameters,
    },
    /// Scattering foil; tracks as a pass-through.
    Scatterer {
        /// Length (m).
        length: f64,
    },
    /// Zero-length marker.
    Marker,
    /// Unknown category placeholder.
    Unknown,
}

impl ElementKind {
    /// Decode a record into its typed view.
    pub fn from_record(record: &ElementRecord) -> Self {
        let length = record.get(Field::Length);
        let bend = || BendParameters {
            length,
            angle: record.get(Field::Angle),
            k1: record.get(Field::K1),
            e1: record.get(Field::E1),
            e2: record.get(Field::E2),
            h1: record.get(Field::H1),
            h2: record.get(Field::H2),
            hgap: record.get(Field::Hgap),
            fint: record.get(Field::Fint),
        };
        match record.class() {
            ElementClass::None => ElementKind::Unknown,
            ElementClass::Drift => ElementKind::Drift { length },
            ElementClass::Collimator => ElementKind::Collimator { length },
            ElementClass::SBend => ElementKind::SBend(bend()),
            ElementClass::RBend => ElementKind::RBend(bend()),
            ElementClass::Quadrupole => ElementKind::Quadrupole {
                length,
                k1: record.get(Field::K1),
            },
            ElementClass::Sextupole => ElementKind::Sextupole {
                length,
                k2: record.get(Field::K2),
            },
            ElementClass::Octupole => ElementKind::Octupole {
                length,
                k3: record.get(Field::K3),
            },
            ElementClass::Decapole => ElementKind::Decapole {
                length,
                k4: record.get(Field::K4),
            },
            ElementClass::Multipole => ElementKind::Multipole {
                length,
                strengths: MultipoleStrengths {
                    k1: record.get(Field::K1),
                    k2: record.get(Field::K2),
                    k3: record.get(Field::K3),
                    k4: record.get(Field::K4),
                },
            },
            ElementClass::Rotation => ElementKind::Rotation {
                angle: record.get(Field::Angle),
            },
            ElementClass::HKicker => ElementKind::HKicker {
                length,
                kick: record.get(Field::Kick),
            },
            ElementClass::VKicker => ElementKind::VKicker {
                length,
                kick: record.get(Field::Kick),
            },
            ElementClass::Degrader => ElementKind::Degrader {
                length,
                loss: LossParameters {
                    moments: [
                        record.get(Field::FeA0),
                        record.get(Field::FeA1),
                        record.get(Field::FeA2),
                    ],
                    dpp: record.get(Field::FeDpp),
                    loss: record.get(Field::FeLoss),
                },
            },
            ElementClass::Scatterer => ElementKind::Scatterer { length },
            ElementClass::Marker => ElementKind::Marker,
        }
    }

    /// The catalog class of this element.
    pub fn class(&self) -> ElementClass {
        match self {
            ElementKind::Drift { .. } => ElementClass::Drift,
            ElementKind::Collimator { .. } => ElementClass::Collimator,
            ElementKind::Quadrupole { .. } => ElementClass::Quadrupole,
            ElementKind::SBend(_) => ElementClass::SBend,
            ElementKind::RBend(_) => ElementClass::RBend,
            ElementKind::Rotation { .. } => ElementClass::Rotation,
            ElementKind::Sextupole { .. } => ElementClass::Sextupole,
            ElementKind::Octupole { .. } => ElementClass::Octupole,
            ElementKind::Decapole { .. } => ElementClass::Decapole,
            ElementKind::Multipole { .. } => ElementClass::Multipole,
            ElementKind::HKicker { .. } => ElementClass::HKicker,
            ElementKind::VKicker { .. } => ElementClass::VKicker,
            ElementKind::Degrader { .. } => ElementClass::Degrader,
            ElementKind::Scatterer { .. } => ElementClass::Scatterer,
            ElementKind::Marker => ElementClass::Marker,
            ElementKind::Unknown => ElementClass::None,
        }
    }
}

/// Transverse aperture of one element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aperture {
    /// Shape.
    pub kind: ApertureKind,
    /// Radius, horizontal half-width or horizontal half-axis (m).
    pub a: f64,
    /// Vertical half-width or half-axis (m). Unused for circles.
    pub b: f64,
}

impl Aperture {
    /// An aperture that never removes particles.
    pub const NONE: Aperture = Aperture {
        kind: ApertureKind::None,
        a: 0.0,
        b: 0.0,
    };

    /// Decode the aperture fields of a record.
    pub fn from_record(record: &ElementRecord) -> Self {
        Self {
            kind: record.aperture_kind(),
            a: record.get(Field::Aperture),
            b: record.get(Field::Aperture2),
        }
    }
}

/// Transverse offset of an element's axis from the reference orbit.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Misalignment {
    /// Horizontal offset (m).
    pub dx: f64,
    /// Vertical offset (m).
    pub dy: f64,
}

impl Misalignment {
    /// Decode the misalignment fields of a record.
    pub fn from_record(record: &ElementRecord) -> Self {
        Self {
            dx: record.get(Field::MisalignmentX),
            dy: record.get(Field::MisalignmentY),
        }
    }

    /// Whether the element sits on the reference orbit.
    pub fn is_zero(&self) -> bool {
        self.dx == 0.0 && self.dy == 0.0
    }
}
