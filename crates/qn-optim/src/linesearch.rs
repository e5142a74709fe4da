//! Strong-Wolfe line search.
//!
//! Bracketing search along a descent direction: a trial failing sufficient
//! decrease shrinks the bracket from above, a trial that is still
//! descending extends it forward, and acceptance requires both Wolfe
//! inequalities. The objective is the only thing evaluated here; the trial
//! budget `nls` is a hard cap.

use crate::bounds;
use crate::minimize::Config;
use crate::vecops::dot;
use qn_core::{Error, Objective, Result};

/// Outcome of one Wolfe line search.
#[derive(Debug, Clone)]
pub struct LineSearchResult {
    /// Whether a step satisfying both strong Wolfe conditions was found.
    pub accepted: bool,
    /// Accepted step length (last trial length when not accepted).
    pub alpha: f64,
    /// Objective value at the accepted iterate.
    pub f_new: f64,
    /// Gradient at the accepted iterate.
    pub g_new: Vec<f64>,
    /// Accepted iterate, projected into the box when bounds are active.
    pub x_new: Vec<f64>,
    /// Objective evaluations spent.
    pub evals: usize,
}

/// Search for `alpha > 0` such that `x + alpha·d` satisfies
///
/// - sufficient decrease: `f(x + alpha·d) <= f + c1·alpha·(g·d)`,
/// - curvature: `|g(x + alpha·d)·d| <= c2·|g·d|`.
///
/// `alpha_start` seeds the first trial (the driver passes the previously
/// accepted step). With `box_bounds` present, every trial — the accepted
/// iterate included — is projected into the box before evaluation.
/// Exhausting `nls` evaluations, or any non-finite value coming back from
/// the objective, yields `accepted == false` with the input state echoed
/// back — a terminal outcome for the driver, never a silent acceptance of
/// a poor step.
///
/// Precondition: `d` must be a descent direction (`g·d < 0`); a violation
/// is a caller logic error and fails with [`Error::NotDescentDirection`].
#[allow(clippy::too_many_arguments)]
pub fn search(
    objective: &dyn Objective,
    x: &[f64],
    f: f64,
    g: &[f64],
    d: &[f64],
    alpha_start: f64,
    config: &Config,
    box_bounds: Option<&[(f64, f64)]>,
) -> Result<LineSearchResult> {
    let n = x.len();
    let slope0 = dot(g, d);
    if slope0 >= 0.0 {
        return Err(Error::NotDescentDirection(slope0));
    }

    let mut lo = 0.0_f64;
    let mut hi = f64::INFINITY;
    let mut alpha = alpha_start;
    let mut evals = 0;

    while evals < config.nls {
        // Trial points are projected into the box before evaluation, so f,
        // g, and the returned iterate always describe the same point.
        let mut x_trial: Vec<f64> =
            x.iter().zip(d.iter()).map(|(xi, di)| xi + alpha * di).collect();
        if let Some(b) = box_bounds {
            x_trial = bounds::clip(&x_trial, b);
        }
        let (f_trial, g_trial) = objective.value_and_gradient(&x_trial)?;
        evals += 1;
        if g_trial.len() != n {
            return Err(Error::Computation(format!(
                "gradient length {} does not match dimension {}",
                g_trial.len(),
                n
            )));
        }

        // A non-finite cost or gradient fails the search outright; NaNs
        // must not flow into the bracket arithmetic or the caller's state.
        if !f_trial.is_finite() || g_trial.iter().any(|v| !v.is_finite()) {
            log::warn!("line search: non-finite objective output at alpha = {alpha:e}");
            break;
        }

        if f_trial > f + config.c1 * alpha * slope0 {
            // Sufficient decrease failed: the step is too long.
            hi = alpha;
            alpha = 0.5 * (lo + hi);
            continue;
        }

        let slope_trial = dot(&g_trial, d);
        if slope_trial.abs() <= config.c2 * slope0.abs() {
            return Ok(LineSearchResult {
                accepted: true,
                alpha,
                f_new: f_trial,
                g_new: g_trial,
                x_new: x_trial,
                evals,
            });
        }

        if slope_trial >= 0.0 {
            // Walked past the minimizer along d.
            hi = alpha;
            alpha = 0.5 * (lo + hi);
        } else {
            // Still descending: the step is too short.
            lo = alpha;
            alpha = if hi.is_finite() { 0.5 * (lo + hi) } else { 2.0 * alpha };
        }
    }

    Ok(LineSearchResult {
        accepted: false,
        alpha,
        f_new: f,
        g_new: g.to_vec(),
        x_new: x.to_vec(),
        evals,
    })
}
