//! Benchmarks for batched assembly over many quadrature points.
//!
//! Run with: `cargo bench --bench assembly_bench --features parallel`
//!
//! Compares serial and rayon-parallel evaluation of local contributions and
//! auxiliary values.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fe_kernels::assembly::{evaluate_aux_batch, evaluate_aux_batch_parallel};
use fe_kernels::{
    evaluate_batch, evaluate_batch_parallel, AuxContext, AuxKernelConfig, FieldRegistry,
    FieldValue, KernelConfig, QpContext,
};
use nalgebra::Vector3;

const FIELDS: [&str; 4] = ["c", "q", "eps", "T"];

const KERNEL: &str = r#"
    type = "ArrheniusReaction"
    variable = "c"
    reactants = ["c"]
    reactant_stoich = [1.0]
    products = ["q"]
    product_stoich = [1.0]
    forward_pre_exponential = 5.0
    forward_activation_energy = 2000.0
    reverse_pre_exponential = 1.0
    reverse_activation_energy = 1000.0
    temperature = "T"
"#;

const AUX: &str = r#"
    type = "KozenyCarmanDarcyCoefficient"
    variable = "q"
    porosity = "eps"
    viscosity = 1.8e-5
    particle_diameter = 1.0e-3
"#;

/// One field state per quadrature point with smoothly varying values.
fn setup_points(n_points: usize) -> Vec<[FieldValue; 4]> {
    (0..n_points)
        .map(|i| {
            let x = i as f64 / n_points as f64;
            [
                FieldValue::new(1.0 + 0.5 * x).with_gradient(Vector3::new(0.5, 0.0, 0.0)),
                FieldValue::new(0.2 + 0.1 * x),
                FieldValue::new(0.35 + 0.1 * x),
                FieldValue::new(300.0 + 50.0 * x),
            ]
        })
        .collect()
}

/// Benchmark kernel batches, serial against parallel.
fn bench_kernel_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("kernel_batch");
    let registry = FieldRegistry::with_fields(FIELDS);
    let kernel = KernelConfig::parse(toml::Deserializer::new(KERNEL))
        .and_then(|config| config.build(&registry))
        .unwrap_or_else(|e| panic!("failed to build benchmark kernel: {e}"));

    for n_points in [1_000, 10_000, 100_000] {
        let points = setup_points(n_points);
        let contexts: Vec<QpContext> = points
            .iter()
            .map(|fields| {
                QpContext::new(fields)
                    .with_test(0.5, Vector3::zeros())
                    .with_trial(0.5, Vector3::zeros())
                    .with_time(1.0, 0.1)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("serial", n_points), &contexts, |b, ctxs| {
            b.iter(|| black_box(evaluate_batch(kernel.as_ref(), black_box(ctxs))));
        });

        group.bench_with_input(BenchmarkId::new("parallel", n_points), &contexts, |b, ctxs| {
            b.iter(|| black_box(evaluate_batch_parallel(kernel.as_ref(), black_box(ctxs))));
        });
    }

    group.finish();
}

/// Benchmark auxiliary batches, serial against parallel.
fn bench_aux_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("aux_batch");
    let registry = FieldRegistry::with_fields(FIELDS);
    let aux = AuxKernelConfig::parse(toml::Deserializer::new(AUX))
        .and_then(|config| config.build(&registry))
        .unwrap_or_else(|e| panic!("failed to build benchmark aux kernel: {e}"));

    for n_points in [1_000, 10_000, 100_000] {
        let points = setup_points(n_points);
        let contexts: Vec<AuxContext> = points.iter().map(|fields| AuxContext::new(fields)).collect();

        group.bench_with_input(BenchmarkId::new("serial", n_points), &contexts, |b, ctxs| {
            b.iter(|| black_box(evaluate_aux_batch(aux.as_ref(), black_box(ctxs))));
        });

        group.bench_with_input(BenchmarkId::new("parallel", n_points), &contexts, |b, ctxs| {
            b.iter(|| black_box(evaluate_aux_batch_parallel(aux.as_ref(), black_box(ctxs))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_kernel_batch, bench_aux_batch);
criterion_main!(benches);
