use criterion::{criterion_group, criterion_main, Criterion};
use qn_core::{Method, Objective, Result};
use qn_optim::lbfgs::two_loop_direction;
use qn_optim::{Config, CorrectionHistory, Minimizer};
use std::hint::black_box;

struct Rosenbrock;

impl Objective for Rosenbrock {
    fn value(&self, x: &[f64]) -> Result<f64> {
        let tmp1 = 1.0 - x[0];
        let tmp2 = x[1] - x[0] * x[0];
        Ok(tmp1 * tmp1 + 100.0 * tmp2 * tmp2)
    }

    fn gradient(&self, x: &[f64]) -> Result<Vec<f64>> {
        let tmp1 = 1.0 - x[0];
        let tmp2 = x[1] - x[0] * x[0];
        Ok(vec![-2.0 * tmp1 - 400.0 * x[0] * tmp2, 200.0 * tmp2])
    }

    fn hessian_vector(&self, x: &[f64], v: &[f64]) -> Result<Vec<f64>> {
        Ok(vec![
            (1200.0 * x[0] * x[0] - 400.0 * x[1] + 2.0) * v[0] - 400.0 * x[0] * v[1],
            -400.0 * x[0] * v[0] + 200.0 * v[1],
        ])
    }
}

/// Fill a large history with synthetic curvature-positive pairs.
fn filled_history(npair: usize, n: usize) -> CorrectionHistory {
    let mut history = CorrectionHistory::new(npair, n);
    for i in 0..npair {
        let s: Vec<f64> = (0..n).map(|j| 1.0 + ((i * n + j) % 7) as f64 * 0.1).collect();
        let y: Vec<f64> = s.iter().map(|v| 2.0 * v + 0.01).collect();
        assert!(history.insert(&s, &y));
    }
    history
}

fn bench_two_loop(c: &mut Criterion) {
    let n = 200;
    let history = filled_history(50, n);
    let g: Vec<f64> = (0..n).map(|j| (j as f64 * 0.37).sin()).collect();

    let mut group = c.benchmark_group("two_loop_direction");
    group.bench_function("n200_m50", |b| {
        b.iter(|| black_box(two_loop_direction(black_box(&g), black_box(&history))))
    });
    group.finish();
}

fn bench_rosenbrock_minimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("rosenbrock_minimize");

    for (name, method) in
        [("lbfgs", Method::Lbfgs), ("nlcg", Method::Nlcg), ("newton_cg", Method::NewtonCg)]
    {
        let minimizer = Minimizer::new(Config { method, ..Config::default() }).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                let res = minimizer.minimize(black_box(&Rosenbrock), &[1.5, 1.5], None).unwrap();
                black_box(res.fval)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_two_loop, bench_rosenbrock_minimize);
criterion_main!(benches);
