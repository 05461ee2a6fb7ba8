//! Reusable lattice fixtures.
//!
//! - [`fodo_cell`]: a focusing cell with a bend and an end marker.
//! - [`overlapping_pair`]: two elements that overlap by 0.5 m.
//! - [`drift_kicker`]: a 2 m drift followed by a thin horizontal kicker.
//! - [`every_class`]: one element per catalog class plus an unknown one.
//! - [`degrader_line`]: a graphite degrader between two drifts.

use strahl_core::{ElementClass, Field, Kinematics, Phase};
use strahl_lattice::ElementDescriptor;

/// Total length of [`fodo_cell`] in metres.
pub const FODO_LENGTH: f64 = 4.0;

/// QF, B1 and QD placed by centre, with gaps between them, closed by an
/// END marker at 4 m.
pub fn fodo_cell() -> Vec<ElementDescriptor> {
    vec![
        ElementDescriptor::new("QF", "QUADRUPOLE")
            .with_length(0.4)
            .at_center(0.5)
            .with_field(Field::K1, 1.2),
        ElementDescriptor::new("B1", "SBEND")
            .with_length(1.0)
            .at_center(1.5)
            .with_field(Field::Angle, 0.1),
        ElementDescriptor::new("QD", "QUADRUPOLE")
            .with_length(0.4)
            .at_center(2.5)
            .with_field(Field::K1, -1.2),
        ElementDescriptor::new("END", "MARKER")
            .with_length(0.0)
            .at_center(FODO_LENGTH),
    ]
}

/// A (0 to 1 m) and B (0.5 to 1.5 m).
pub fn overlapping_pair() -> Vec<ElementDescriptor> {
    vec![
        ElementDescriptor::new("A", "QUADRUPOLE").with_length(1.0).at_entry(0.0),
        ElementDescriptor::new("B", "QUADRUPOLE").with_length(1.0).at_entry(0.5),
    ]
}

/// D (2 m drift) then K (zero-length horizontal kicker, 1 mrad).
pub fn drift_kicker() -> Vec<ElementDescriptor> {
    vec![
        ElementDescriptor::new("D", "DRIFT").with_length(2.0).at_entry(0.0),
        ElementDescriptor::new("K", "HKICKER")
            .with_length(0.0)
            .at_entry(2.0)
            .with_field(Field::Kick, 0.001),
    ]
}

/// Name of the element of [`every_class`] whose class is not in the
/// catalog.
pub const UNKNOWN_NAME: &str = "MYSTERY";

/// One 0.1 m element per catalog class (degraders get a material), in
/// catalog order, followed by one element of an unknown class.
pub fn every_class() -> Vec<ElementDescriptor> {
    let mut out: Vec<ElementDescriptor> = ElementClass::ALL
        .into_iter()
        .filter(|c| *c != ElementClass::None)
        .map(|c| {
            let e = ElementDescriptor::new(format!("E_{}", c.name()), c.name()).with_length(0.1);
            if c.consumes_energy() {
                e.with_material("graphite")
            } else {
                e
            }
        })
        .collect();
    out.push(ElementDescriptor::new(UNKNOWN_NAME, "WIGGLER").with_length(0.1));
    out
}

/// D1 (1 m), DEG (5 cm of graphite), D2 (1 m).
pub fn degrader_line() -> Vec<ElementDescriptor> {
    vec![
        ElementDescriptor::new("D1", "DRIFT").with_length(1.0).at_entry(0.0),
        ElementDescriptor::new("DEG", "DEGRADER")
            .with_length(0.05)
            .at_entry(1.0)
            .with_material("graphite"),
        ElementDescriptor::new("D2", "DRIFT").with_length(1.0).at_entry(1.05),
    ]
}

/// A 230 MeV proton.
pub fn proton_230() -> Kinematics {
    Kinematics::proton(230.0).expect("230 MeV is a valid proton energy")
}

/// `n` particles on a line in x from `-half_width` to `half_width`, all
/// other coordinates zero.
pub fn x_fan(n: usize, half_width: f64) -> Vec<Phase> {
    if n == 1 {
        return vec![[0.0; 5]];
    }
    (0..n)
        .map(|i| {
            let x = -half_width + 2.0 * half_width * i as f64 / (n - 1) as f64;
            [x, 0.0, 0.0, 0.0, 0.0]
        })
        .collect()
}
