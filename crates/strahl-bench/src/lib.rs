//! Benchmark profiles and utilities for the strahl tracking engine.
//!
//! Provides pre-built lattices and beams for benchmarks and examples:
//!
//! - [`ring_cell`]: one FODO cell with chromatic sextupoles and correctors
//! - [`reference_ring`]: 16 cells (128 magnets), compiled at 230 MeV
//! - [`stress_ring`]: 128 cells (1024 magnets) for resolver and compiler load
//! - [`reference_beam`]: a matched Gaussian beam

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strahl_beam::{Beam, Distribution, TwissParameters};
use strahl_compile::{compile, CompileContext, CompiledLattice, NoScattering, ReferenceEnergy};
use strahl_core::Field;
use strahl_lattice::{DriftOptions, ElementDescriptor, Lattice};

/// Length of one [`ring_cell`] in metres.
pub const CELL_LENGTH: f64 = 4.0;

/// Reference kinetic energy of the benchmark profiles (MeV).
pub const REFERENCE_ENERGY: f64 = 230.0;

/// One FODO cell starting at `offset`, with element names suffixed by `index`.
///
/// Sequence: QF, SF, HK, B, QD, SD, VK, B (no drifts; gaps are filled by
/// [`Lattice::add_drifts`]). QD carries a 40 mm circular aperture.
pub fn ring_cell(index: usize, offset: f64) -> Vec<ElementDescriptor> {
    let at = |s: f64| offset + s;
    vec![
        ElementDescriptor::new(format!("QF{index}"), "QUADRUPOLE")
            .with_length(0.3)
            .at_entry(at(0.0))
            .with_field(Field::K1, 1.1),
        ElementDescriptor::new(format!("SF{index}"), "SEXTUPOLE")
            .with_length(0.1)
            .at_entry(at(0.4))
            .with_field(Field::K2, 2.0),
        ElementDescriptor::new(format!("HK{index}"), "HKICKER")
            .with_length(0.1)
            .at_entry(at(0.6))
            .with_field(Field::Kick, 1e-5),
        ElementDescriptor::new(format!("BA{index}"), "SBEND")
            .with_length(1.0)
            .at_entry(at(0.8))
            .with_field(Field::Angle, std::f64::consts::PI / 16.0),
        ElementDescriptor::new(format!("QD{index}"), "QUADRUPOLE")
            .with_length(0.3)
            .at_entry(at(2.0))
            .with_field(Field::K1, -1.1)
            .with_aperture("CIRCLE", 0.04),
        ElementDescriptor::new(format!("SD{index}"), "SEXTUPOLE")
            .with_length(0.1)
            .at_entry(at(2.4))
            .with_field(Field::K2, -2.0),
        ElementDescriptor::new(format!("VK{index}"), "VKICKER")
            .with_length(0.1)
            .at_entry(at(2.6))
            .with_field(Field::Kick, -1e-5),
        ElementDescriptor::new(format!("BB{index}"), "SBEND")
            .with_length(1.0)
            .at_entry(at(2.8))
            .with_field(Field::Angle, std::f64::consts::PI / 16.0),
    ]
}

/// Descriptors of `cells` consecutive [`ring_cell`]s.
pub fn ring_descriptors(cells: usize) -> Vec<ElementDescriptor> {
    (0..cells)
        .flat_map(|i| ring_cell(i, i as f64 * CELL_LENGTH))
        .collect()
}

/// Resolve and compile `cells` ring cells with drifts inserted.
///
/// # Panics
///
/// If `cells` is zero.
pub fn compiled_ring(cells: usize) -> CompiledLattice {
    let lattice = Lattice::new("ring", ring_descriptors(cells))
        .and_then(|l| l.add_drifts(&DriftOptions::default()))
        .expect("ring cells are well formed");
    let ctx = CompileContext::new(ReferenceEnergy::KineticEnergy(REFERENCE_ENERGY));
    compile(&lattice, &ctx, &NoScattering).expect("ring cells compile")
}

/// 16 cells, 64 m of ring.
pub fn reference_ring() -> CompiledLattice {
    compiled_ring(16)
}

/// 128 cells, 512 m of ring.
pub fn stress_ring() -> CompiledLattice {
    compiled_ring(128)
}

/// `n` particles matched to β = 5 m, α = 0 in both planes with 1 mm·mrad
/// emittance and 1e-3 momentum spread, at the reference energy of `lattice`.
///
/// # Panics
///
/// If `n` is zero.
pub fn reference_beam(lattice: &CompiledLattice, n: usize, seed: u64) -> Beam {
    let plane = TwissParameters {
        alpha: 0.0,
        beta: 5.0,
        emittance: 1e-6,
    };
    let coords = Distribution::twiss(n, plane, plane, 1e-3, seed).expect("non-empty beam");
    Beam::new(*lattice.reference(), coords).expect("matched beam is finite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strahl_core::ElementClass;

    #[test]
    fn ring_cells_abut() {
        let ring = compiled_ring(2);
        let names: Vec<&str> = ring.elements().iter().map(|e| e.name.as_str()).collect();
        // Seven gaps inside each cell plus the one between the cells.
        assert_eq!(names.iter().filter(|n| n.starts_with("DRIFT_")).count(), 15);
        assert_eq!(ring.position_of("QF1").map(|i| i.0), Some(16));
    }

    #[test]
    fn reference_ring_has_every_kind_of_map() {
        let ring = reference_ring();
        let classes: Vec<ElementClass> =
            ring.elements().iter().map(|e| e.record().class()).collect();
        for class in [
            ElementClass::Drift,
            ElementClass::Quadrupole,
            ElementClass::Sextupole,
            ElementClass::SBend,
            ElementClass::HKicker,
            ElementClass::VKicker,
        ] {
            assert!(classes.contains(&class), "{class:?} missing");
        }
    }

    #[test]
    fn reference_beam_is_deterministic() {
        let ring = reference_ring();
        let a = reference_beam(&ring, 64, 42);
        let b = reference_beam(&ring, 64, 42);
        assert_eq!(a.coordinates(), b.coordinates());
        assert_eq!(a.alive_count(), 64);
    }
}
