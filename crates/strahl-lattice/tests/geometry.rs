//! Resolver properties over generated and fixture lattices.

use proptest::prelude::*;
use strahl_lattice::{
    geometry, DriftOptions, ElementDescriptor, Lattice, LatticeError, LatticeOptions,
};
use strahl_test_utils::fixtures;

const TOLERANCE: f64 = 1e-9;

fn names(lattice: &Lattice) -> Vec<String> {
    lattice.elements().iter().map(|e| e.name.clone()).collect()
}

#[test]
fn resolved_lattice_is_a_fixed_point() {
    let lattice = Lattice::new("fodo", fixtures::fodo_cell()).unwrap();
    let geometries = lattice.elements().iter().map(|e| e.geometry).collect();
    let (again, report) = geometry::resolve(geometries, &names(&lattice), 100).unwrap();
    assert_eq!(report.changing_passes, 0);
    for (e, g) in lattice.elements().iter().zip(again) {
        assert_eq!(e.geometry, g);
    }
}

#[test]
fn drifted_fodo_is_contiguous() {
    let lattice = Lattice::new("fodo", fixtures::fodo_cell())
        .unwrap()
        .add_drifts(&DriftOptions::default())
        .unwrap();
    for pair in lattice.elements().windows(2) {
        let exit = pair[0].geometry.at_exit.unwrap();
        let entry = pair[1].geometry.at_entry.unwrap();
        assert!((exit - entry).abs() < TOLERANCE, "{} -> {}", pair[0].name, pair[1].name);
    }
    assert!((lattice.length() - fixtures::FODO_LENGTH).abs() < TOLERANCE);
}

#[test]
fn survey_input_resolves_to_positions() {
    let mut bend = ElementDescriptor::new("B", "SBEND")
        .with_length(0.2)
        .with_survey(1000.0, 0.0, 0.0);
    bend.angle = Some(90.0);
    let elements = vec![
        ElementDescriptor::new("A", "QUADRUPOLE")
            .with_length(0.2)
            .with_survey(0.0, 0.0, 0.0),
        bend,
        ElementDescriptor::new("C", "QUADRUPOLE")
            .with_length(0.2)
            .with_survey(1000.0, 2000.0, 0.0),
    ];
    let options = LatticeOptions {
        from_survey: true,
        ..LatticeOptions::default()
    };
    let lattice = Lattice::with_options("survey", elements, &options).unwrap();

    let placed: Vec<(f64, f64)> = lattice
        .elements()
        .iter()
        .map(|e| (e.geometry.at_entry.unwrap(), e.geometry.at_exit.unwrap()))
        .collect();
    for ((entry, exit), expected) in placed.into_iter().zip([0.0, 1.0, 3.0]) {
        assert!((entry - expected).abs() < TOLERANCE);
        assert!((exit - (expected + 0.2)).abs() < TOLERANCE);
    }
    assert!((lattice.length() - 3.2).abs() < TOLERANCE);
    let angle = lattice.get("B").and_then(|e| e.angle).unwrap();
    assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}

#[test]
fn survey_input_without_points_is_rejected() {
    let elements = vec![
        ElementDescriptor::new("A", "DRIFT").with_length(1.0),
        ElementDescriptor::new("B", "DRIFT")
            .with_length(1.0)
            .with_survey(0.0, 0.0, 0.0),
    ];
    let options = LatticeOptions {
        from_survey: true,
        ..LatticeOptions::default()
    };
    assert!(matches!(
        Lattice::with_options("survey", elements, &options),
        Err(LatticeError::MissingSurveyData { names }) if names == ["A"]
    ));
}

#[test]
fn overlapping_elements_report_both_names() {
    let lattice = Lattice::new("overlap", fixtures::overlapping_pair()).unwrap();
    match lattice.add_drifts(&DriftOptions::default()) {
        Err(LatticeError::NegativeDriftLength { offenders }) => {
            assert_eq!(offenders.len(), 1);
            assert_eq!(offenders[0].previous.as_deref(), Some("A"));
            assert_eq!(offenders[0].next, "B");
            assert!(offenders[0].length < 0.0);
        }
        other => panic!("expected NegativeDriftLength, got {other:?}"),
    }
}

#[test]
fn every_overlap_is_reported_at_once() {
    let elements = vec![
        ElementDescriptor::new("A", "QUADRUPOLE").with_length(1.0).at_entry(0.0),
        ElementDescriptor::new("B", "QUADRUPOLE").with_length(1.0).at_entry(0.5),
        ElementDescriptor::new("C", "QUADRUPOLE").with_length(1.0).at_entry(3.0),
        ElementDescriptor::new("D", "QUADRUPOLE").with_length(1.0).at_entry(3.2),
    ];
    let err = Lattice::new("two", elements)
        .unwrap()
        .add_drifts(&DriftOptions::default())
        .unwrap_err();
    let msg = err.to_string();
    for name in ["A", "B", "C", "D"] {
        assert!(msg.contains(&format!("'{name}'")), "{msg}");
    }
}

#[test]
fn sliced_and_concatenated_lattices_keep_adjacency() {
    let line = Lattice::new("fodo", fixtures::fodo_cell())
        .unwrap()
        .add_drifts(&DriftOptions::default())
        .unwrap();
    let half = line.slice("QF", "QD").unwrap();
    let renamed: Vec<ElementDescriptor> = line
        .elements()
        .iter()
        .map(|e| ElementDescriptor {
            name: format!("B_{}", e.name),
            ..e.clone()
        })
        .collect();
    let second = Lattice::new("b", renamed).unwrap();
    let joined = Lattice::concatenate(&[line, second]).unwrap();
    for lattice in [&half, &joined] {
        for pair in lattice.elements().windows(2) {
            let gap = pair[1].geometry.at_entry.unwrap() - pair[0].geometry.at_exit.unwrap();
            assert!(gap.abs() < TOLERANCE);
        }
    }
    assert!((joined.length() - 2.0 * fixtures::FODO_LENGTH).abs() < TOLERANCE);
}

fn sparse_line() -> impl Strategy<Value = Vec<ElementDescriptor>> {
    // Each element: (length, gap before it, whether its centre is given).
    prop::collection::vec((0.0..3.0f64, 0.0..2.0f64, any::<bool>()), 1..24).prop_map(|rows| {
        let mut s = 0.0;
        rows.into_iter()
            .enumerate()
            .map(|(i, (length, gap, placed))| {
                let e = ElementDescriptor::new(format!("E{i}"), "QUADRUPOLE").with_length(length);
                // Unplaced elements abut their predecessor.
                let e = if placed {
                    s += gap;
                    e.at_center(s + length / 2.0)
                } else {
                    e
                };
                s += length;
                e
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn resolution_is_idempotent(elements in sparse_line()) {
        let lattice = Lattice::new("p", elements).unwrap();
        let geometries = lattice.elements().iter().map(|e| e.geometry).collect();
        let (again, report) = geometry::resolve(geometries, &names(&lattice), 100).unwrap();
        prop_assert_eq!(report.changing_passes, 0);
        for (e, g) in lattice.elements().iter().zip(again) {
            prop_assert!(g.is_complete());
            prop_assert_eq!(e.geometry, g);
        }
    }

    #[test]
    fn drifted_lattice_is_contiguous(elements in sparse_line()) {
        let lattice = Lattice::new("p", elements)
            .unwrap()
            .add_drifts(&DriftOptions::default())
            .unwrap();
        prop_assert!(lattice.elements()[0].geometry.at_entry.unwrap().abs() < TOLERANCE);
        for pair in lattice.elements().windows(2) {
            let exit = pair[0].geometry.at_exit.unwrap();
            let entry = pair[1].geometry.at_entry.unwrap();
            prop_assert!((exit - entry).abs() < TOLERANCE);
        }
    }

    #[test]
    fn centers_are_midpoints(elements in sparse_line()) {
        let lattice = Lattice::new("p", elements).unwrap();
        for e in lattice.elements() {
            let g = e.geometry;
            let mid = (g.at_entry.unwrap() + g.at_exit.unwrap()) / 2.0;
            prop_assert!((g.at_center.unwrap() - mid).abs() < TOLERANCE);
        }
    }
}
