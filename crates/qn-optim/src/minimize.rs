//! Driver loop and run configuration.

use crate::bounds;
use crate::direction::DirectionStrategy;
use crate::linesearch;
use crate::progress::ProgressObserver;
use crate::vecops::norm_l2;
use qn_core::{Error, IterationRecord, Method, MinimizeResult, Objective, Result, Status};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable per-run configuration.
///
/// Constructed once before the loop, never mutated. Missing fields in a
/// JSON config fall back to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of outer iterations.
    pub niter: usize,
    /// Maximum number of objective evaluations per line search.
    pub nls: usize,
    /// Convergence tolerance: stop once `f_k < tol * f0`.
    pub tol: f64,
    /// L-BFGS memory length (stored correction pairs).
    pub npair: usize,
    /// Sufficient-decrease (Armijo) constant. Nocedal value: 1e-4.
    pub c1: f64,
    /// Curvature constant of the strong Wolfe conditions. Nocedal value: 0.9.
    pub c2: f64,
    /// Step length seeding the very first line search.
    #[serde(rename = "alpha")]
    pub alpha_init: f64,
    /// Whether iterates are clipped into the box supplied to `minimize`.
    pub bound: bool,
    /// Search-direction strategy.
    pub method: Method,
    /// Inner iteration cap for Newton-CG.
    pub ncg: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            niter: 100,
            nls: 20,
            tol: 1e-8,
            npair: 5,
            c1: 1e-4,
            c2: 0.9,
            alpha_init: 1.0,
            bound: false,
            method: Method::default(),
            ncg: 5,
        }
    }
}

impl Config {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.niter == 0 {
            return Err(Error::Validation("niter must be positive".to_string()));
        }
        if self.nls == 0 {
            return Err(Error::Validation("nls must be positive".to_string()));
        }
        if self.npair == 0 {
            return Err(Error::Validation("npair must be positive".to_string()));
        }
        if self.ncg == 0 {
            return Err(Error::Validation("ncg must be positive".to_string()));
        }
        if !(self.tol > 0.0 && self.tol.is_finite()) {
            return Err(Error::Validation(format!("tol must be positive, got {}", self.tol)));
        }
        if !(self.alpha_init > 0.0 && self.alpha_init.is_finite()) {
            return Err(Error::Validation(format!(
                "initial step length must be positive, got {}",
                self.alpha_init
            )));
        }
        if !(0.0 < self.c1 && self.c1 < self.c2 && self.c2 < 1.0) {
            return Err(Error::Validation(format!(
                "Wolfe constants must satisfy 0 < c1 < c2 < 1, got c1={}, c2={}",
                self.c1, self.c2
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file; absent fields keep defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }
}

/// Driver for the minimization loop.
///
/// Owns nothing but the configuration; all run state lives on the stack of
/// [`Minimizer::minimize`] and is passed explicitly into each component.
pub struct Minimizer {
    config: Config,
}

impl Minimizer {
    /// Create a driver with a validated configuration.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this driver runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Minimize `objective` starting from `x0`.
    ///
    /// `box_bounds` is consulted only when `config.bound` is set, in which
    /// case it must be present with one `(lo, hi)` interval per parameter;
    /// the initial iterate is clipped into the box before the first
    /// evaluation, and every line-search trial is projected before it is
    /// evaluated.
    pub fn minimize(
        &self,
        objective: &dyn Objective,
        x0: &[f64],
        box_bounds: Option<&[(f64, f64)]>,
    ) -> Result<MinimizeResult> {
        self.minimize_observed(objective, x0, box_bounds, None)
    }

    /// Like [`Minimizer::minimize`], reporting each accepted iteration to
    /// `observer`.
    pub fn minimize_observed(
        &self,
        objective: &dyn Objective,
        x0: &[f64],
        box_bounds: Option<&[(f64, f64)]>,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<MinimizeResult> {
        let config = &self.config;
        let n = x0.len();
        if n == 0 {
            return Err(Error::Validation("empty initial iterate".to_string()));
        }

        let active_bounds = if config.bound {
            let b = box_bounds.ok_or_else(|| {
                Error::Validation("bound is enabled but no bounds were supplied".to_string())
            })?;
            bounds::validate(b, n)?;
            Some(b)
        } else {
            None
        };

        let mut x = match active_bounds {
            Some(b) => bounds::clip(x0, b),
            None => x0.to_vec(),
        };

        let (mut f, mut g) = objective.value_and_gradient(&x)?;
        if g.len() != n {
            return Err(Error::Computation(format!(
                "gradient length {} does not match dimension {}",
                g.len(),
                n
            )));
        }
        if !f.is_finite() || g.iter().any(|v| !v.is_finite()) {
            return Err(Error::Computation(
                "objective is not finite at the initial iterate".to_string(),
            ));
        }

        let f0 = f;
        let mut grad_evals = 1_usize;
        let mut line_searches = 0_usize;
        let mut completed = 0_usize;
        let mut alpha_prev = config.alpha_init;
        let mut strategy = DirectionStrategy::new(config.method, n, config.npair, config.ncg);
        let mut status = Status::MaxIterReached;

        for iter in 0..config.niter {
            let d = strategy.compute(objective, &x, &g)?;

            let ls = linesearch::search(
                objective,
                &x,
                f,
                &g,
                &d,
                alpha_prev,
                config,
                active_bounds,
            )?;
            grad_evals += ls.evals;
            line_searches += 1;

            if !ls.accepted {
                log::warn!(
                    "line search failed after {} evaluations at iteration {iter}",
                    ls.evals
                );
                status = Status::LineSearchFailed;
                break;
            }

            x = ls.x_new;
            f = ls.f_new;
            g = ls.g_new;
            // Warm-start the next search from the step that just worked.
            alpha_prev = ls.alpha;
            completed = iter + 1;

            if let Some(obs) = observer.as_deref_mut() {
                obs.on_iteration(&IterationRecord {
                    iter,
                    fval: f,
                    rel_decrease: f / f0,
                    grad_norm: norm_l2(&g),
                    alpha: ls.alpha,
                    ls_evals: ls.evals,
                    grad_evals,
                });
            }

            if f < config.tol * f0 {
                status = Status::Converged;
                break;
            }
        }

        Ok(MinimizeResult {
            grad_norm: norm_l2(&g),
            x,
            fval: f,
            f0,
            n_iter: completed,
            n_grad_evals: grad_evals,
            n_line_searches: line_searches,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, Minimizer};
    use crate::progress::CollectingObserver;
    use approx::assert_relative_eq;
    use qn_core::{Error, Method, Objective, Result, Status};

    // f(x, y) = (x - 2)^2 + (y - 3)^2, minimum 0 at (2, 3).
    struct Quadratic;

    impl Objective for Quadratic {
        fn value(&self, x: &[f64]) -> Result<f64> {
            Ok((x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2))
        }

        fn gradient(&self, x: &[f64]) -> Result<Vec<f64>> {
            Ok(vec![2.0 * (x[0] - 2.0), 2.0 * (x[1] - 3.0)])
        }

        fn hessian_vector(&self, _x: &[f64], v: &[f64]) -> Result<Vec<f64>> {
            Ok(vec![2.0 * v[0], 2.0 * v[1]])
        }
    }

    struct NanAwayFromOrigin;

    impl Objective for NanAwayFromOrigin {
        fn value(&self, x: &[f64]) -> Result<f64> {
            if x[0].abs() > 0.5 {
                Ok(f64::NAN)
            } else {
                Ok(1.0 + x[0])
            }
        }

        fn gradient(&self, _x: &[f64]) -> Result<Vec<f64>> {
            Ok(vec![1.0])
        }
    }

    fn converges_with(method: Method) {
        let config = Config { method, tol: 1e-10, ..Config::default() };
        let minimizer = Minimizer::new(config).unwrap();
        let result = minimizer.minimize(&Quadratic, &[0.0, 0.0], None).unwrap();

        assert_eq!(result.status, Status::Converged, "method {method} should converge");
        assert_relative_eq!(result.x[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(result.x[1], 3.0, epsilon = 1e-4);
        assert!(result.fval < 1e-10 * result.f0);
    }

    #[test]
    fn quadratic_converges_with_lbfgs() {
        converges_with(Method::Lbfgs);
    }

    #[test]
    fn quadratic_converges_with_nlcg() {
        converges_with(Method::Nlcg);
    }

    #[test]
    fn quadratic_converges_with_newton_cg() {
        converges_with(Method::NewtonCg);
    }

    #[test]
    fn bound_flag_without_bounds_is_a_validation_error() {
        let config = Config { bound: true, ..Config::default() };
        let minimizer = Minimizer::new(config).unwrap();
        let res = minimizer.minimize(&Quadratic, &[0.0, 0.0], None);
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[test]
    fn bounded_run_keeps_iterates_in_the_box() {
        // Unconstrained minimum (2, 3) lies outside x's box.
        let config = Config { bound: true, method: Method::Lbfgs, ..Config::default() };
        let minimizer = Minimizer::new(config).unwrap();
        let bounds = [(0.0, 1.0), (0.0, 5.0)];
        let result = minimizer.minimize(&Quadratic, &[0.5, 0.5], Some(&bounds)).unwrap();

        assert!(result.x[0] >= 0.0 && result.x[0] <= 1.0);
        assert!(result.x[1] >= 0.0 && result.x[1] <= 5.0);
        // The constrained optimum is (1, 3) with f = 1; the relative-decrease
        // criterion cannot fire there, so the run stalls near it instead.
        assert!(result.x[0] > 0.95, "x0 should be pinned near its bound, got {}", result.x[0]);
        assert_relative_eq!(result.x[1], 3.0, epsilon = 1e-2);
        assert!((result.fval - 1.0).abs() < 0.1, "fval should approach 1, got {}", result.fval);
    }

    #[test]
    fn initial_iterate_is_clipped_before_first_evaluation() {
        let config = Config { bound: true, niter: 1, ..Config::default() };
        let minimizer = Minimizer::new(config).unwrap();
        let bounds = [(0.0, 1.0), (0.0, 1.0)];
        let result = minimizer.minimize(&Quadratic, &[10.0, -10.0], Some(&bounds)).unwrap();
        // f0 must be the value at the clipped point (1, 0), i.e. 1 + 9.
        assert_relative_eq!(result.f0, 10.0);
    }

    #[test]
    fn non_finite_trials_surface_as_line_search_failure() {
        let minimizer = Minimizer::new(Config::default()).unwrap();
        let result = minimizer.minimize(&NanAwayFromOrigin, &[0.0], None).unwrap();
        assert_eq!(result.status, Status::LineSearchFailed);
        assert!(result.fval.is_finite());
    }

    #[test]
    fn observer_sees_one_record_per_accepted_iteration() {
        let config = Config { method: Method::Lbfgs, ..Config::default() };
        let minimizer = Minimizer::new(config).unwrap();
        let mut observer = CollectingObserver::default();
        let result = minimizer
            .minimize_observed(&Quadratic, &[0.0, 0.0], None, Some(&mut observer))
            .unwrap();

        assert_eq!(observer.records.len(), result.n_iter);
        // Counters are monotone and per-run.
        let mut prev = 0;
        for record in &observer.records {
            assert!(record.grad_evals > prev);
            prev = record.grad_evals;
        }
    }

    #[test]
    fn config_validation_rejects_bad_wolfe_constants() {
        let config = Config { c1: 0.95, c2: 0.9, ..Config::default() };
        assert!(matches!(config.validate(), Err(Error::Validation(_))));
        assert!(Minimizer::new(config).is_err());
    }

    #[test]
    fn config_json_roundtrip_with_partial_fields() {
        let config: Config =
            serde_json::from_str(r#"{"method": "lbfgs", "npair": 7, "alpha": 0.5}"#).unwrap();
        assert_eq!(config.method, Method::Lbfgs);
        assert_eq!(config.npair, 7);
        assert_relative_eq!(config.alpha_init, 0.5);
        // Everything else keeps its default.
        assert_eq!(config.niter, 100);
        assert_relative_eq!(config.c2, 0.9);
    }
}
