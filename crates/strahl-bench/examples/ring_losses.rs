//! Misalignment scan on the reference ring.
//!
//! Demonstrates: compile a lattice → adjust a record field in place → track
//! a matched beam for several turns → read per-element losses.
//!
//! Run with `RUST_LOG=strahl_engine=debug` to see per-turn events.

use strahl_bench::{reference_beam, reference_ring};
use strahl_compile::Variable;
use strahl_core::Field;
use strahl_engine::{track, TrackConfig};
use strahl_obs::{LossObserver, ObserverConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .init();

    let mut ring = reference_ring();
    let beam = reference_beam(&ring, 5_000, 42);
    let shift = [Variable::new("QD3", Field::MisalignmentX)];
    let config = TrackConfig::default().with_turns(10).with_integrator(2, 4);

    println!("=== strahl misalignment scan: QD3 ===\n");
    for dx_mm in [0.0, 5.0, 10.0, 15.0, 20.0] {
        ring.adjust(&shift, &[dx_mm * 1e-3]).unwrap();

        let obs = LossObserver::new(ObserverConfig::everything());
        let out = track(&ring, beam.clone(), obs, config.clone()).unwrap();
        let worst = out
            .output
            .worst_element()
            .map(|((turn, element), drop)| {
                let name = &ring.elements()[element.0].name;
                format!("{name} in turn {turn} (-{:.2}%)", 100.0 * drop)
            })
            .unwrap_or_else(|| "none".to_string());

        tracing::info!(dx_mm, lost = out.metrics.particles_lost, "scan point done");
        println!(
            "  dx={:>5.1} mm: transmission={:>7.3}%, lost={:>5}, worst={}, time={:>7}μs",
            dx_mm,
            100.0 * out.output.transmission,
            out.metrics.particles_lost,
            worst,
            out.metrics.elapsed_us,
        );
    }
}
