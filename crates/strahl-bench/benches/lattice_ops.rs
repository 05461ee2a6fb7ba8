//! Criterion benchmarks for lattice construction, transforms and compilation.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use strahl_bench::{ring_descriptors, REFERENCE_ENERGY};
use strahl_compile::{compile, CompileContext, NoScattering, ReferenceEnergy};
use strahl_lattice::{DriftOptions, ElementDescriptor, Lattice, LatticeOptions};

/// 1024 magnets placed by entry position.
fn placed() -> Vec<ElementDescriptor> {
    ring_descriptors(128)
}

/// The same magnets abutting each other, only the first one placed.
///
/// Worst case for the resolver: placements propagate one element per pass.
fn abutting() -> Vec<ElementDescriptor> {
    let mut elements = placed();
    for e in elements.iter_mut().skip(1) {
        e.geometry.at_entry = None;
    }
    elements
}

/// The same magnets as survey input, centres on a straight line in mm.
fn surveyed() -> Vec<ElementDescriptor> {
    placed()
        .into_iter()
        .map(|mut e| {
            let length = e.geometry.length.unwrap_or(0.0);
            let center = e.geometry.at_entry.unwrap_or(0.0) + length / 2.0;
            e.geometry.at_entry = None;
            e.angle = e.angle.map(f64::to_degrees);
            e.with_survey(0.0, 0.0, center * 1000.0)
        })
        .collect()
}

/// Benchmark: resolve 1024 placed magnets (two passes).
fn bench_resolve_placed_1k(c: &mut Criterion) {
    let elements = placed();
    c.bench_function("resolve_placed_1k", |b| {
        b.iter(|| black_box(Lattice::new("ring", elements.clone()).unwrap().len()));
    });
}

/// Benchmark: resolve 1024 abutting magnets.
fn bench_resolve_abutting_1k(c: &mut Criterion) {
    let elements = abutting();
    c.bench_function("resolve_abutting_1k", |b| {
        b.iter(|| black_box(Lattice::new("ring", elements.clone()).unwrap().report()));
    });
}

/// Benchmark: survey conversion followed by resolution.
fn bench_survey_1k(c: &mut Criterion) {
    let elements = surveyed();
    let options = LatticeOptions {
        from_survey: true,
        ..LatticeOptions::default()
    };
    c.bench_function("survey_1k", |b| {
        b.iter(|| {
            black_box(
                Lattice::with_options("ring", elements.clone(), &options)
                    .unwrap()
                    .length(),
            )
        });
    });
}

/// Benchmark: drift insertion and marker insertion on the resolved ring.
fn bench_transforms_1k(c: &mut Criterion) {
    let lattice = Lattice::new("ring", placed()).unwrap();
    let drifts = DriftOptions::default();

    c.bench_function("add_drifts_1k", |b| {
        b.iter(|| black_box(lattice.add_drifts(&drifts).unwrap().len()));
    });
    c.bench_function("add_markers_1k", |b| {
        b.iter(|| black_box(lattice.add_markers().unwrap().len()));
    });
}

/// Benchmark: compile the drift-filled ring (about 2K elements).
fn bench_compile_2k(c: &mut Criterion) {
    let lattice = Lattice::new("ring", placed())
        .unwrap()
        .add_drifts(&DriftOptions::default())
        .unwrap();
    let ctx = CompileContext::new(ReferenceEnergy::KineticEnergy(REFERENCE_ENERGY));

    c.bench_function("compile_2k", |b| {
        b.iter(|| black_box(compile(&lattice, &ctx, &NoScattering).unwrap().len()));
    });
}

criterion_group!(
    benches,
    bench_resolve_placed_1k,
    bench_resolve_abutting_1k,
    bench_survey_1k,
    bench_transforms_1k,
    bench_compile_2k
);
criterion_main!(benches);
