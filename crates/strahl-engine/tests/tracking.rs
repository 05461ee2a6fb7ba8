//! End-to-end tracking: lattice construction, compilation and the
//! tracking loop together.

use proptest::prelude::*;
use strahl_beam::{Beam, Distribution, ParticleStatus};
use strahl_compile::{compile, CompileContext, CompiledLattice, NoScattering, ReferenceEnergy};
use strahl_core::{Coord, ElementIndex, Field, TurnIndex};
use strahl_engine::{
    track, track_batch, BatchConfig, CancelToken, TrackConfig, TrackError, TrackState, Tracker,
};
use strahl_lattice::{DriftOptions, ElementDescriptor, Lattice};
use strahl_obs::{LossObserver, NullObserver, ObserverConfig};
use strahl_test_utils::{fixtures, ObserverEvent, RecordingObserver};

fn compiled(elements: Vec<ElementDescriptor>) -> CompiledLattice {
    let lattice = Lattice::new("test", elements).unwrap();
    let ctx = CompileContext::new(ReferenceEnergy::KineticEnergy(230.0));
    compile(&lattice, &ctx, &NoScattering).unwrap()
}

fn beam(coords: Vec<[f64; 5]>) -> Beam {
    Beam::new(fixtures::proton_230(), coords).unwrap()
}

#[test]
fn drift_then_kicker_on_axis() {
    let lattice = compiled(fixtures::drift_kicker());
    let config = TrackConfig::default().with_integrator(1, 1).with_turns(1);
    let out = track(&lattice, beam(vec![[0.0; 5]]), NullObserver::new(), config).unwrap();
    let p = out.beam.coordinates()[0];
    assert_eq!(p[Coord::Px.index()], 0.001);
    assert_eq!(p[Coord::X.index()], 0.0);
    assert_eq!(out.metrics.elements_processed, 2);
}

#[test]
fn observer_calls_follow_the_lattice_walk() {
    let lattice = compiled(fixtures::drift_kicker());
    let obs = RecordingObserver::new(ObserverConfig::everything());
    let config = TrackConfig::default().with_turns(2);
    let events = track(&lattice, beam(vec![[0.0; 5]]), obs, config)
        .unwrap()
        .output;
    let kinds: Vec<String> = events
        .iter()
        .map(|e| match e {
            ObserverEvent::Start { .. } => "start".to_string(),
            ObserverEvent::Element { turn, element, .. } => format!("e{}.{}", turn.0, element.0),
            ObserverEvent::Turn { turn, .. } => format!("t{}", turn.0),
            ObserverEvent::End { turn, element, .. } => format!("end{}.{}", turn.0, element.0),
        })
        .collect();
    assert_eq!(
        kinds,
        ["start", "e0.0", "e0.1", "t0", "e1.0", "e1.1", "t1", "end1.1"]
    );
}

#[test]
fn observer_sees_state_after_each_element() {
    let lattice = compiled(fixtures::drift_kicker());
    let obs = RecordingObserver::new(ObserverConfig::everything());
    let start = vec![[0.0, 0.01, 0.0, 0.0, 0.0]];
    let events = track(&lattice, beam(start), obs, TrackConfig::default())
        .unwrap()
        .output;
    let xs: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            ObserverEvent::Element { x, .. } => Some(x[0]),
            _ => None,
        })
        .collect();
    // 2 m of drift at 10 mrad, then a zero-length kicker.
    assert_eq!(xs.len(), 2);
    assert!((xs[0] - 0.02).abs() < 1e-15);
    assert!((xs[1] - 0.02).abs() < 1e-15);
}

#[test]
fn allow_list_limits_element_records() {
    let lattice = compiled(fixtures::drift_kicker());
    let obs = RecordingObserver::new(ObserverConfig::at_elements([ElementIndex(1)]));
    let events = track(&lattice, beam(vec![[0.0; 5]]), obs, TrackConfig::default().with_turns(3))
        .unwrap()
        .output;
    let elements: Vec<(TurnIndex, ElementIndex)> = events
        .iter()
        .filter_map(|e| match e {
            ObserverEvent::Element { turn, element, .. } => Some((*turn, *element)),
            _ => None,
        })
        .collect();
    assert_eq!(
        elements,
        [
            (TurnIndex(0), ElementIndex(1)),
            (TurnIndex(1), ElementIndex(1)),
            (TurnIndex(2), ElementIndex(1)),
        ]
    );
    assert!(!events.iter().any(|e| matches!(e, ObserverEvent::Turn { .. })));
}

fn recorded_elements(config: ObserverConfig) -> Vec<ElementIndex> {
    let lattice = compiled(fixtures::drift_kicker());
    let obs = RecordingObserver::new(config);
    track(&lattice, beam(vec![[0.0; 5]]), obs, TrackConfig::default())
        .unwrap()
        .output
        .iter()
        .filter_map(|e| match e {
            ObserverEvent::Element { element, .. } => Some(*element),
            _ => None,
        })
        .collect()
}

#[test]
fn element_flag_and_allow_list_both_gate_records() {
    let mut narrowed = ObserverConfig::everything();
    narrowed.elements = Some([ElementIndex(1)].into_iter().collect());
    assert_eq!(recorded_elements(narrowed), [ElementIndex(1)]);

    let mut inactive = ObserverConfig::at_elements([ElementIndex(1)]);
    inactive.element_by_element = false;
    assert!(recorded_elements(inactive).is_empty());

    assert_eq!(
        recorded_elements(ObserverConfig::everything()),
        [ElementIndex(0), ElementIndex(1)]
    );
}

#[test]
fn collimated_fodo_loses_the_halo() {
    let mut elements = fixtures::fodo_cell();
    elements.insert(
        0,
        ElementDescriptor::new("COL", "COLLIMATOR")
            .with_length(0.1)
            .at_entry(0.0)
            .with_aperture("CIRCLE", 0.005),
    );
    let lattice = Lattice::new("fodo", elements)
        .unwrap()
        .add_drifts(&DriftOptions::default())
        .unwrap();
    let ctx = CompileContext::new(ReferenceEnergy::KineticEnergy(230.0));
    let lattice = compile(&lattice, &ctx, &NoScattering).unwrap();

    let coords = fixtures::x_fan(11, 0.01);
    let obs = LossObserver::new(ObserverConfig::everything());
    let out = track(&lattice, beam(coords), obs, TrackConfig::default()).unwrap();
    // Rows at x = -0.004 ..= 0.004 survive; |x| >= 0.006 is lost.
    assert_eq!(out.beam.alive_count(), 5);
    assert_eq!(out.metrics.particles_lost, 6);
    assert!((out.output.transmission - 5.0 / 11.0).abs() < 1e-12);
    for (p, s) in out.beam.coordinates().iter().zip(out.beam.status()) {
        if let ParticleStatus::Lost { turn, element } = s {
            assert_eq!((*turn, *element), (TurnIndex(0), ElementIndex(0)));
            assert!(p[0].abs() > 0.005);
        }
    }
}

#[test]
fn cancelled_tracker_keeps_partial_beam() {
    let lattice = compiled(fixtures::drift_kicker());
    let token = CancelToken::new();
    let config = TrackConfig::default().with_cancel(token.clone());
    let start = vec![[0.0, 0.001, 0.0, 0.0, 0.0]];
    let mut tracker = Tracker::new(&lattice, beam(start), NullObserver::new(), config).unwrap();
    assert!(matches!(tracker.step(), Ok(TrackState::Running { .. })));
    token.cancel();
    assert!(matches!(tracker.step(), Err(TrackError::Cancelled { .. })));
    let partial = tracker.into_beam();
    assert!((partial.coordinates()[0][0] - 0.002).abs() < 1e-15);
    assert_eq!(partial.coordinates()[0][1], 0.001);
}

#[test]
fn outcome_beam_is_the_last_live_state() {
    // One drift per turn: three turns leave the second buffer live.
    let lattice = compiled(vec![ElementDescriptor::new("D", "DRIFT")
        .with_length(1.0)
        .at_entry(0.0)]);
    let input = beam(vec![[0.0, 0.001, 0.0, 0.0, 0.0], [0.0; 5]]);
    let kinematics = *input.kinematics();
    let config = TrackConfig::default().with_turns(3);
    let out = track(&lattice, input, NullObserver::new(), config).unwrap();
    assert_eq!(*out.beam.kinematics(), kinematics);
    assert_eq!(out.beam.len(), 2);
    assert!((out.beam.coordinates()[0][0] - 0.003).abs() < 1e-15);
    assert_eq!(out.beam.coordinates()[1], [0.0; 5]);
    assert!(out.beam.status().iter().all(|s| s.is_alive()));
}

#[test]
fn batch_results_keep_input_order() {
    let lattice = compiled(fixtures::drift_kicker());
    let beams: Vec<Beam> = (0..9)
        .map(|i| beam(vec![[0.0, i as f64 * 1e-3, 0.0, 0.0, 0.0]]))
        .collect();
    let config = BatchConfig {
        workers: Some(3),
        ..BatchConfig::default()
    };
    let results = track_batch(&lattice, beams, &config, |_| NullObserver::new());
    assert_eq!(results.len(), 9);
    for (i, r) in results.iter().enumerate() {
        let p = r.as_ref().unwrap().beam.coordinates()[0];
        assert!((p[0] - 2.0 * i as f64 * 1e-3).abs() < 1e-15, "beam {i}");
    }
}

#[test]
fn batch_reports_config_errors_per_beam() {
    let lattice = compiled(fixtures::drift_kicker());
    let config = BatchConfig {
        track: TrackConfig::default().with_integrator(3, 1),
        workers: Some(2),
    };
    let results = track_batch(
        &lattice,
        vec![beam(vec![[0.0; 5]]), beam(vec![[0.0; 5]])],
        &config,
        |_| NullObserver::new(),
    );
    assert!(results.iter().all(|r| matches!(r, Err(TrackError::Config(_)))));
}

fn kicked_ring() -> Vec<ElementDescriptor> {
    vec![
        ElementDescriptor::new("QF", "QUADRUPOLE")
            .with_length(0.3)
            .at_entry(0.0)
            .with_field(Field::K1, 0.8),
        ElementDescriptor::new("SX", "SEXTUPOLE")
            .with_length(0.1)
            .with_field(Field::K2, 4.0),
        ElementDescriptor::new("HK", "HKICKER")
            .with_length(0.2)
            .with_field(Field::Kick, 1e-4),
        ElementDescriptor::new("QD", "QUADRUPOLE")
            .with_length(0.3)
            .with_field(Field::K1, -0.8),
    ]
}

proptest! {
    #[test]
    fn turns_compose(seed in any::<u64>(), order in prop::sample::select(vec![1u8, 2, 4])) {
        let lattice = compiled(kicked_ring());
        let coords = Distribution::gaussian(16, [1e-3, 1e-4, 1e-3, 1e-4, 1e-3], seed).unwrap();
        let config = TrackConfig::default().with_integrator(order, 3);

        let two = track(&lattice, beam(coords.clone()), NullObserver::new(), config.clone().with_turns(2))
            .unwrap()
            .beam;
        let once = track(&lattice, beam(coords), NullObserver::new(), config.clone()).unwrap().beam;
        let twice = track(&lattice, once, NullObserver::new(), config).unwrap().beam;
        prop_assert_eq!(two.coordinates(), twice.coordinates());
    }

    #[test]
    fn stepping_matches_running(seed in any::<u64>()) {
        let lattice = compiled(kicked_ring());
        let coords = Distribution::gaussian(8, [1e-3, 1e-4, 1e-3, 1e-4, 0.0], seed).unwrap();
        let config = TrackConfig::default().with_turns(3);

        let run = track(&lattice, beam(coords.clone()), NullObserver::new(), config.clone()).unwrap();
        let mut tracker = Tracker::new(&lattice, beam(coords), NullObserver::new(), config).unwrap();
        let mut steps = 0;
        while tracker.step().unwrap() != TrackState::Finished {
            steps += 1;
        }
        prop_assert_eq!(steps + 1, 3 * lattice.len());
        let stepped = tracker.into_outcome().unwrap();
        prop_assert_eq!(run.beam.coordinates(), stepped.beam.coordinates());
        prop_assert_eq!(run.metrics.elements_processed, stepped.metrics.elements_processed);
    }
}
