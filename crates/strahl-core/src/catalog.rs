//! The closed element and aperture catalogs.
//!
//! Every element category and aperture shape maps to a small integer
//! code stored in the compiled record. Codes are stable: they are part of
//! the record layout and are never reordered.

use std::fmt;

/// Category of a lattice element.
///
/// Unknown category names map to [`ElementClass::None`], which tracks as
/// a zero-effect placeholder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementClass {
    /// Unknown or unsupported category.
    None = 0,
    /// Field-free drift space.
    Drift = 1,
    /// Drift space with a (usually tight) aperture.
    Collimator = 2,
    /// Sector bend.
    SBend = 3,
    /// Rectangular bend.
    RBend = 4,
    /// Quadrupole.
    Quadrupole = 5,
    /// Sextupole.
    Sextupole = 6,
    /// Octupole.
    Octupole = 7,
    /// Decapole.
    Decapole = 8,
    /// Combined thin multipole.
    Multipole = 9,
    /// Rotation of the transverse plane about the beam axis.
    Rotation = 10,
    /// Horizontal dipole kicker.
    HKicker = 11,
    /// Vertical dipole kicker.
    VKicker = 12,
    /// Energy degrader.
    Degrader = 13,
    /// Scattering foil.
    Scatterer = 14,
    /// Zero-length marker.
    Marker = 15,
}

impl ElementClass {
    /// Every class in code order.
    pub const ALL: [ElementClass; 16] = [
        ElementClass::None,
        ElementClass::Drift,
        ElementClass::Collimator,
        ElementClass::SBend,
        ElementClass::RBend,
        ElementClass::Quadrupole,
        ElementClass::Sextupole,
        ElementClass::Octupole,
        ElementClass::Decapole,
        ElementClass::Multipole,
        ElementClass::Rotation,
        ElementClass::HKicker,
        ElementClass::VKicker,
        ElementClass::Degrader,
        ElementClass::Scatterer,
        ElementClass::Marker,
    ];

    /// Numeric code stored in the compiled record.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a class by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Look up a class from the value stored in a record's class-code field.
    ///
    /// Non-integral or out-of-range values decode to [`ElementClass::None`].
    pub fn from_record_value(value: f64) -> Self {
        if value.fract() != 0.0 || !(0.0..=u8::MAX as f64).contains(&value) {
            return ElementClass::None;
        }
        Self::from_code(value as u8).unwrap_or(ElementClass::None)
    }

    /// Map a category tag to its class. Unknown tags map to `None`.
    ///
    /// Matching is ASCII case-insensitive.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(ElementClass::None)
    }

    /// Canonical uppercase tag.
    pub const fn name(self) -> &'static str {
        match self {
            ElementClass::None => "NONE",
            ElementClass::Drift => "DRIFT",
            ElementClass::Collimator => "COLLIMATOR",
            ElementClass::SBend => "SBEND",
            ElementClass::RBend => "RBEND",
            ElementClass::Quadrupole => "QUADRUPOLE",
            ElementClass::Sextupole => "SEXTUPOLE",
            ElementClass::Octupole => "OCTUPOLE",
            ElementClass::Decapole => "DECAPOLE",
            ElementClass::Multipole => "MULTIPOLE",
            ElementClass::Rotation => "ROTATION",
            ElementClass::HKicker => "HKICKER",
            ElementClass::VKicker => "VKICKER",
            ElementClass::Degrader => "DEGRADER",
            ElementClass::Scatterer => "SCATTERER",
            ElementClass::Marker => "MARKER",
        }
    }

    /// Classes propagated by a linear transfer matrix.
    pub const fn is_matrix(self) -> bool {
        matches!(
            self,
            ElementClass::Drift
                | ElementClass::Collimator
                | ElementClass::Quadrupole
                | ElementClass::SBend
                | ElementClass::RBend
                | ElementClass::Rotation
        )
    }

    /// Classes propagated by a nonlinear kick map.
    pub const fn is_kick(self) -> bool {
        matches!(
            self,
            ElementClass::Sextupole
                | ElementClass::Octupole
                | ElementClass::Decapole
                | ElementClass::Multipole
                | ElementClass::HKicker
                | ElementClass::VKicker
        )
    }

    /// Classes that consume beam energy through material interaction.
    pub const fn consumes_energy(self) -> bool {
        matches!(self, ElementClass::Degrader | ElementClass::Scatterer)
    }
}

impl fmt::Display for ElementClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Transverse aperture shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApertureKind {
    /// No aperture: particles are never lost here.
    None = 0,
    /// Circle of radius `APERTURE`.
    Circle = 1,
    /// Ellipse with half-axes `APERTURE` and `APERTURE_2`.
    Ellipse = 2,
    /// Rectangle with half-widths `APERTURE` and `APERTURE_2`.
    Rectangle = 3,
}

impl ApertureKind {
    /// Numeric code stored in the compiled record.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a shape by its numeric code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ApertureKind::None),
            1 => Some(ApertureKind::Circle),
            2 => Some(ApertureKind::Ellipse),
            3 => Some(ApertureKind::Rectangle),
            _ => None,
        }
    }

    /// Look up a shape from the value stored in a record's aperture-code field.
    pub fn from_record_value(value: f64) -> Self {
        if value.fract() != 0.0 || !(0.0..=u8::MAX as f64).contains(&value) {
            return ApertureKind::None;
        }
        Self::from_code(value as u8).unwrap_or(ApertureKind::None)
    }

    /// Map a shape tag (`"CIRCLE"`, `"ELLIPSE"`, `"RECTANGLE"`) to its kind.
    /// Anything else maps to `None`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("CIRCLE") {
            ApertureKind::Circle
        } else if name.eq_ignore_ascii_case("ELLIPSE") {
            ApertureKind::Ellipse
        } else if name.eq_ignore_ascii_case("RECTANGLE") {
            ApertureKind::Rectangle
        } else {
            ApertureKind::None
        }
    }

    /// Canonical uppercase tag.
    pub const fn name(self) -> &'static str {
        match self {
            ApertureKind::None => "NONE",
            ApertureKind::Circle => "CIRCLE",
            ApertureKind::Ellipse => "ELLIPSE",
            ApertureKind::Rectangle => "RECTANGLE",
        }
    }
}

impl fmt::Display for ApertureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for class in ElementClass::ALL {
            assert_eq!(ElementClass::from_code(class.code()), Some(class));
            assert_eq!(ElementClass::from_name(class.name()), class);
            assert_eq!(ElementClass::from_record_value(class.code() as f64), class);
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(ElementClass::from_name("RFCAVITY"), ElementClass::None);
        assert_eq!(ElementClass::from_name(""), ElementClass::None);
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(ElementClass::from_name("quadrupole"), ElementClass::Quadrupole);
        assert_eq!(ApertureKind::from_name("circle"), ApertureKind::Circle);
    }

    #[test]
    fn groups_are_disjoint() {
        for class in ElementClass::ALL {
            let groups = [class.is_matrix(), class.is_kick(), class.consumes_energy()];
            assert!(groups.iter().filter(|&&g| g).count() <= 1, "{class} in two groups");
        }
    }

    #[test]
    fn garbage_record_values_decode_to_none() {
        assert_eq!(ElementClass::from_record_value(2.5), ElementClass::None);
        assert_eq!(ElementClass::from_record_value(-1.0), ElementClass::None);
        assert_eq!(ElementClass::from_record_value(99.0), ElementClass::None);
        assert_eq!(ApertureKind::from_record_value(7.0), ApertureKind::None);
    }
}
