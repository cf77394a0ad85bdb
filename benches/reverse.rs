use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use chainrule::{grad, Dual, Graph, Traversal, VectorFunction};

#[path = "common/mod.rs"]
mod common;
use common::*;

fn bench_reverse_gradient(c: &mut Criterion) {
    let mut group = c.benchmark_group("reverse_gradient");
    for n in [2, 10, 100, 1000] {
        let x = make_input(n);

        group.bench_with_input(BenchmarkId::new("f64_eval", n), &x, |b, x| {
            b.iter(|| black_box(rosenbrock_f64(black_box(x))))
        });

        group.bench_with_input(BenchmarkId::new("rosenbrock_rev", n), &x, |b, x| {
            b.iter(|| black_box(grad(|v| rosenbrock(v), black_box(x))))
        });

        group.bench_with_input(BenchmarkId::new("rastrigin_rev", n), &x, |b, x| {
            b.iter(|| black_box(grad(|v| rastrigin(v), black_box(x))))
        });
    }
    group.finish();
}

fn bench_reverse_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("crossover_fwd_vs_rev");
    for n in [2, 3, 5, 10, 20] {
        let x = make_input(n);

        group.bench_with_input(BenchmarkId::new("forward_n_passes", n), &x, |b, x| {
            b.iter(|| {
                let mut g = vec![0.0; x.len()];
                for i in 0..x.len() {
                    let inputs: Vec<Dual<f64>> = x
                        .iter()
                        .enumerate()
                        .map(|(k, &xi)| {
                            if k == i {
                                Dual::variable(xi)
                            } else {
                                Dual::constant(xi)
                            }
                        })
                        .collect();
                    if let Ok(y) = rosenbrock(&inputs) {
                        g[i] = y.deriv();
                    }
                }
                black_box(g)
            })
        });

        group.bench_with_input(BenchmarkId::new("reverse_1_pass", n), &x, |b, x| {
            b.iter(|| black_box(grad(|v| rosenbrock(v), black_box(x))))
        });
    }
    group.finish();
}

fn bench_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");
    // PerPath revisits shared nodes once per path, so keep the depth small.
    for layers in [4, 8, 12] {
        for traversal in [Traversal::PerPath, Traversal::Sweep] {
            group.bench_with_input(
                BenchmarkId::new(format!("{traversal:?}"), layers),
                &layers,
                |b, &layers| {
                    b.iter(|| {
                        let graph = Graph::<f64>::new();
                        let x = [graph.variable(0.3)];
                        if let Ok(y) = diamond(&x, layers) {
                            black_box(y.reverse_with(traversal).wrt(&x[0]).ok());
                        }
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_expression(c: &mut Criterion) {
    let f = VectorFunction::parse(
        &["x*y + sin(z)", "exp(-x**2) * log(y, 2)", "sqrt(x**2 + y**2 + z**2)"],
        &["x", "y", "z"],
    );
    let Ok(f) = f else { return };
    let point = [0.4, 1.7, -0.2];

    let mut group = c.benchmark_group("expression");
    for mode in [chainrule::Mode::Forward, chainrule::Mode::Reverse] {
        group.bench_function(format!("{mode:?}"), |b| {
            b.iter(|| black_box(f.evaluate_with(black_box(&point), mode)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_reverse_gradient,
    bench_reverse_crossover,
    bench_traversal,
    bench_expression
);
criterion_main!(benches);
