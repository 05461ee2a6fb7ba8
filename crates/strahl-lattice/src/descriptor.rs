//! Symbolic element descriptors.
//!
//! An [`ElementDescriptor`] is one row of the symbolic lattice table. Every
//! optional column is an explicit `Option`, resolved once at construction,
//! rather than a presence check at each use site.

use strahl_core::record::Field;

/// Aperture size as written in the lattice input.
#[derive(Clone, Debug, PartialEq)]
pub enum ApertureValue {
    /// A single numeric size (m).
    Size(f64),
    /// A literal such as `"0.03"`, `"[0.03, 0.02]"` or `"{0.01,0.02}"`.
    Text(String),
}

impl From<f64> for ApertureValue {
    fn from(v: f64) -> Self {
        ApertureValue::Size(v)
    }
}

impl From<&str> for ApertureValue {
    fn from(v: &str) -> Self {
        ApertureValue::Text(v.to_string())
    }
}

/// Absolute survey position of an element centre, in millimetres.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct SurveyPoint {
    /// Horizontal coordinate (mm).
    pub x: f64,
    /// Vertical coordinate (mm).
    pub y: f64,
    /// Longitudinal coordinate (mm).
    pub z: f64,
}

/// The placement subset of a descriptor: the fields the geometry resolver
/// derives and compares between passes.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Geometry {
    /// Element length (m).
    pub length: Option<f64>,
    /// Length of the design orbit through the element (m).
    pub orbit_length: Option<f64>,
    /// Position of the entrance face (m).
    pub at_entry: Option<f64>,
    /// Position of the element centre (m).
    pub at_center: Option<f64>,
    /// Position of the exit face (m).
    pub at_exit: Option<f64>,
}

impl Geometry {
    /// Every field is known.
    pub fn is_complete(&self) -> bool {
        self.length.is_some()
            && self.orbit_length.is_some()
            && self.at_entry.is_some()
            && self.at_center.is_some()
            && self.at_exit.is_some()
    }

    /// Shift every position by `offset`.
    pub fn shifted(mut self, offset: f64) -> Self {
        self.at_entry = self.at_entry.map(|v| v + offset);
        self.at_center = self.at_center.map(|v| v + offset);
        self.at_exit = self.at_exit.map(|v| v + offset);
        self
    }
}

/// One symbolic lattice element.
///
/// `name` is the primary key within a lattice; `class` is the category
/// tag as written in the input (mapped to the catalog at compile time).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ElementDescriptor {
    /// Unique element name.
    pub name: String,
    /// Category tag (e.g. `"QUADRUPOLE"`).
    pub class: String,
    /// Placement fields.
    pub geometry: Geometry,
    /// Bend or rotation angle (rad; degrees in survey input).
    pub angle: Option<f64>,
    /// Entrance edge angle (rad).
    pub e1: Option<f64>,
    /// Exit edge angle (rad).
    pub e2: Option<f64>,
    /// Entrance pole-face curvature (1/m).
    pub h1: Option<f64>,
    /// Exit pole-face curvature (1/m).
    pub h2: Option<f64>,
    /// Full gap height (m).
    pub hgap: Option<f64>,
    /// Fringe-field integral.
    pub fint: Option<f64>,
    /// Quadrupole strength (1/m²).
    pub k1: Option<f64>,
    /// Sextupole strength (1/m³).
    pub k2: Option<f64>,
    /// Octupole strength (1/m⁴).
    pub k3: Option<f64>,
    /// Decapole strength (1/m⁵).
    pub k4: Option<f64>,
    /// Kicker deflection (rad).
    pub kick: Option<f64>,
    /// Horizontal misalignment (m).
    pub misalignment_x: Option<f64>,
    /// Vertical misalignment (m).
    pub misalignment_y: Option<f64>,
    /// Name of the powering circuit, or for aperture plugs a bracketed
    /// list of one or two circuit names.
    pub circuit: Option<String>,
    /// Which record field the circuit feeds (e.g. `"K1"`, `"APERTURE"`).
    pub plug: Option<String>,
    /// Aperture shape tag.
    pub apertype: Option<String>,
    /// First aperture size, possibly a two-component literal.
    pub aperture: Option<ApertureValue>,
    /// Second aperture size (m).
    pub aperture_2: Option<f64>,
    /// Material for degraders and scatterers.
    pub material: Option<String>,
    /// Absolute survey position.
    pub survey: Option<SurveyPoint>,
    /// `false` for elements synthesized by transforms (drifts, markers).
    pub physical: bool,
}

impl ElementDescriptor {
    /// A physical element with only its name and category set.
    pub fn new(name: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            physical: true,
            ..Self::default()
        }
    }

    /// Set the length.
    pub fn with_length(mut self, length: f64) -> Self {
        self.geometry.length = Some(length);
        self
    }

    /// Set the orbit length.
    pub fn with_orbit_length(mut self, orbit_length: f64) -> Self {
        self.geometry.orbit_length = Some(orbit_length);
        self
    }

    /// Set the entrance position.
    pub fn at_entry(mut self, s: f64) -> Self {
        self.geometry.at_entry = Some(s);
        self
    }

    /// Set the centre position.
    pub fn at_center(mut self, s: f64) -> Self {
        self.geometry.at_center = Some(s);
        self
    }

    /// Set the exit position.
    pub fn at_exit(mut self, s: f64) -> Self {
        self.geometry.at_exit = Some(s);
        self
    }

    /// Set a numeric record field carried by the descriptor.
    ///
    /// Fields the descriptor does not carry (codes, aperture sizes,
    /// energy-loss parameters, rigidity) are ignored.
    pub fn with_field(mut self, field: Field, value: f64) -> Self {
        if let Some(slot) = self.field_slot(field) {
            *slot = Some(value);
        }
        self
    }

    /// Attach a circuit and the field it feeds.
    pub fn with_circuit(mut self, circuit: impl Into<String>, plug: impl Into<String>) -> Self {
        self.circuit = Some(circuit.into());
        self.plug = Some(plug.into());
        self
    }

    /// Attach an aperture.
    pub fn with_aperture(
        mut self,
        apertype: impl Into<String>,
        aperture: impl Into<ApertureValue>,
    ) -> Self {
        self.apertype = Some(apertype.into());
        self.aperture = Some(aperture.into());
        self
    }

    /// Set the material of a degrader or scatterer.
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Set the absolute survey position (mm).
    pub fn with_survey(mut self, x: f64, y: f64, z: f64) -> Self {
        self.survey = Some(SurveyPoint { x, y, z });
        self
    }

    /// Value of a numeric record field carried by the descriptor.
    ///
    /// `LENGTH` reads the geometry; fields the descriptor does not carry
    /// return `None`.
    pub fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::Length => self.geometry.length,
            Field::Angle => self.angle,
            Field::E1 => self.e1,
            Field::E2 => self.e2,
            Field::H1 => self.h1,
            Field::H2 => self.h2,
            Field::K1 => self.k1,
            Field::K2 => self.k2,
            Field::K3 => self.k3,
            Field::K4 => self.k4,
            Field::Kick => self.kick,
            Field::Hgap => self.hgap,
            Field::Fint => self.fint,
            Field::MisalignmentX => self.misalignment_x,
            Field::MisalignmentY => self.misalignment_y,
            _ => None,
        }
    }

    fn field_slot(&mut self, field: Field) -> Option<&mut Option<f64>> {
        match field {
            Field::Length => Some(&mut self.geometry.length),
            Field::Angle => Some(&mut self.angle),
            Field::E1 => Some(&mut self.e1),
            Field::E2 => Some(&mut self.e2),
            Field::H1 => Some(&mut self.h1),
            Field::H2 => Some(&mut self.h2),
            Field::K1 => Some(&mut self.k1),
            Field::K2 => Some(&mut self.k2),
            Field::K3 => Some(&mut self.k3),
            Field::K4 => Some(&mut self.k4),
            Field::Kick => Some(&mut self.kick),
            Field::Hgap => Some(&mut self.hgap),
            Field::Fint => Some(&mut self.fint),
            Field::MisalignmentX => Some(&mut self.misalignment_x),
            Field::MisalignmentY => Some(&mut self.misalignment_y),
            _ => None,
        }
    }

    /// Whether the category tag names `class` (case-insensitive).
    pub fn is_class(&self, class: &str) -> bool {
        self.class.trim().eq_ignore_ascii_case(class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let e = ElementDescriptor::new("Q1", "QUADRUPOLE")
            .with_length(0.3)
            .with_field(Field::K1, 2.0)
            .with_circuit("I_Q1", "K1")
            .with_aperture("CIRCLE", 0.05);
        assert!(e.physical);
        assert_eq!(e.geometry.length, Some(0.3));
        assert_eq!(e.field(Field::K1), Some(2.0));
        assert_eq!(e.plug.as_deref(), Some("K1"));
        assert_eq!(e.aperture, Some(ApertureValue::Size(0.05)));
    }

    #[test]
    fn uncarried_fields_are_ignored() {
        let e = ElementDescriptor::new("D", "DRIFT").with_field(Field::Brho, 3.0);
        assert_eq!(e.field(Field::Brho), None);
    }

    #[test]
    fn shifted_moves_only_positions() {
        let g = Geometry {
            length: Some(1.0),
            orbit_length: Some(1.0),
            at_entry: Some(0.0),
            at_center: Some(0.5),
            at_exit: Some(1.0),
        }
        .shifted(2.0);
        assert_eq!(g.at_entry, Some(2.0));
        assert_eq!(g.at_exit, Some(3.0));
        assert_eq!(g.length, Some(1.0));
    }
}
