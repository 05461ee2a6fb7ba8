//! The canonical fixed-width numeric element record.
//!
//! One [`ElementRecord`] per lattice element, in lattice order. The field
//! order is fixed by [`Field`] and mirrors the flat row layout returned by
//! [`ElementRecord::to_row`]. Every field defaults to `0.0`.

use std::fmt;
use std::str::FromStr;

use crate::catalog::{ApertureKind, ElementClass};
use crate::error::FieldNameError;

/// Number of scalar fields in one record.
pub const RECORD_WIDTH: usize = 25;

/// Canonical record field, in column order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Element class code (see [`ElementClass`]).
    ClassCode = 0,
    /// Length in metres.
    Length,
    /// Bend angle (rad) or rotation angle for rotations.
    Angle,
    /// Entrance edge angle (rad).
    E1,
    /// Exit edge angle (rad).
    E2,
    /// Entrance pole-face curvature (1/m).
    H1,
    /// Exit pole-face curvature (1/m).
    H2,
    /// Normalized quadrupole strength (1/m²).
    K1,
    /// Normalized sextupole strength (1/m³).
    K2,
    /// Normalized octupole strength (1/m⁴).
    K3,
    /// Normalized decapole strength (1/m⁵).
    K4,
    /// Kicker deflection (rad).
    Kick,
    /// Aperture shape code (see [`ApertureKind`]).
    AperTypeCode,
    /// First aperture size (m).
    Aperture,
    /// Second aperture size (m).
    Aperture2,
    /// Full gap height used by the fringe-field correction (m).
    Hgap,
    /// Fringe-field integral.
    Fint,
    /// Fermi-Eyges moment A0.
    FeA0,
    /// Fermi-Eyges moment A1.
    FeA1,
    /// Fermi-Eyges moment A2.
    FeA2,
    /// Momentum spread added by the degrader.
    FeDpp,
    /// Fraction of particles lost in the degrader.
    FeLoss,
    /// Magnetic rigidity at the element entrance (T·m).
    Brho,
    /// Horizontal misalignment (m).
    MisalignmentX,
    /// Vertical misalignment (m).
    MisalignmentY,
}

impl Field {
    /// Every field in column order.
    pub const ALL: [Field; RECORD_WIDTH] = [
        Field::ClassCode,
        Field::Length,
        Field::Angle,
        Field::E1,
        Field::E2,
        Field::H1,
        Field::H2,
        Field::K1,
        Field::K2,
        Field::K3,
        Field::K4,
        Field::Kick,
        Field::AperTypeCode,
        Field::Aperture,
        Field::Aperture2,
        Field::Hgap,
        Field::Fint,
        Field::FeA0,
        Field::FeA1,
        Field::FeA2,
        Field::FeDpp,
        Field::FeLoss,
        Field::Brho,
        Field::MisalignmentX,
        Field::MisalignmentY,
    ];

    /// Column index of this field.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Canonical uppercase column name.
    pub const fn name(self) -> &'static str {
        match self {
            Field::ClassCode => "CLASS_CODE",
            Field::Length => "LENGTH",
            Field::Angle => "ANGLE",
            Field::E1 => "E1",
            Field::E2 => "E2",
            Field::H1 => "H1",
            Field::H2 => "H2",
            Field::K1 => "K1",
            Field::K2 => "K2",
            Field::K3 => "K3",
            Field::K4 => "K4",
            Field::Kick => "KICK",
            Field::AperTypeCode => "APERTYPE_CODE",
            Field::Aperture => "APERTURE",
            Field::Aperture2 => "APERTURE_2",
            Field::Hgap => "HGAP",
            Field::Fint => "FINT",
            Field::FeA0 => "FE_A0",
            Field::FeA1 => "FE_A1",
            Field::FeA2 => "FE_A2",
            Field::FeDpp => "FE_DPP",
            Field::FeLoss => "FE_LOSS",
            Field::Brho => "BRHO",
            Field::MisalignmentX => "MISALIGNMENT_X",
            Field::MisalignmentY => "MISALIGNMENT_Y",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| FieldNameError {
                name: s.to_string(),
            })
    }
}

/// A compiled element: one fixed-width row of scalars.
///
/// Stored as a flat array indexed by [`Field`] so that the row layout is
/// the storage layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementRecord {
    values: [f64; RECORD_WIDTH],
}

impl Default for ElementRecord {
    fn default() -> Self {
        Self {
            values: [0.0; RECORD_WIDTH],
        }
    }
}

impl ElementRecord {
    /// A record of the given class with every other field at `0.0`.
    pub fn new(class: ElementClass) -> Self {
        let mut record = Self::default();
        record.set_class(class);
        record
    }

    /// Build a record from a flat row in canonical order.
    pub fn from_row(values: [f64; RECORD_WIDTH]) -> Self {
        Self { values }
    }

    /// The flat row in canonical order.
    pub fn to_row(&self) -> [f64; RECORD_WIDTH] {
        self.values
    }

    /// Read one field.
    pub fn get(&self, field: Field) -> f64 {
        self.values[field.index()]
    }

    /// Write one field.
    pub fn set(&mut self, field: Field, value: f64) {
        self.values[field.index()] = value;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: Field, value: f64) -> Self {
        self.set(field, value);
        self
    }

    /// Decoded element class.
    pub fn class(&self) -> ElementClass {
        ElementClass::from_record_value(self.get(Field::ClassCode))
    }

    /// Store the element class code.
    pub fn set_class(&mut self, class: ElementClass) {
        self.set(Field::ClassCode, class.code() as f64);
    }

    /// Decoded aperture shape.
    pub fn aperture_kind(&self) -> ApertureKind {
        ApertureKind::from_record_value(self.get(Field::AperTypeCode))
    }

    /// Store the aperture shape code.
    pub fn set_aperture_kind(&mut self, kind: ApertureKind) {
        self.set(Field::AperTypeCode, kind.code() as f64);
    }

    /// Element length in metres.
    pub fn length(&self) -> f64 {
        self.get(Field::Length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_indices_are_dense() {
        for (i, f) in Field::ALL.iter().enumerate() {
            assert_eq!(f.index(), i);
        }
        assert_eq!(Field::ALL.len(), RECORD_WIDTH);
    }

    #[test]
    fn field_names_parse_back() {
        for f in Field::ALL {
            assert_eq!(f.name().parse::<Field>(), Ok(f));
        }
        assert_eq!("k1".parse::<Field>(), Ok(Field::K1));
    }

    #[test]
    fn unknown_field_name_is_error() {
        let err = "FOO".parse::<Field>().unwrap_err();
        assert_eq!(err.name, "FOO");
    }

    #[test]
    fn default_record_is_all_zero() {
        let r = ElementRecord::default();
        assert!(r.to_row().iter().all(|&v| v == 0.0));
        assert_eq!(r.class(), ElementClass::None);
        assert_eq!(r.aperture_kind(), ApertureKind::None);
    }

    #[test]
    fn set_and_get_by_field() {
        let r = ElementRecord::new(ElementClass::Quadrupole)
            .with(Field::Length, 0.5)
            .with(Field::K1, 1.2);
        assert_eq!(r.class(), ElementClass::Quadrupole);
        assert_eq!(r.get(Field::K1), 1.2);
        assert_eq!(r.to_row()[Field::Length.index()], 0.5);
        assert_eq!(ElementRecord::from_row(r.to_row()), r);
    }
}
