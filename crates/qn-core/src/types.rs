//! Common data types for the qn toolkit

use serde::{Deserialize, Serialize};
use std::fmt;

/// Search-direction strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Truncated Newton: solve `H·d = -g` approximately by inner conjugate
    /// gradient on Hessian-vector products.
    NewtonCg,
    /// Limited-memory BFGS (two-loop recursion over stored correction pairs).
    Lbfgs,
    /// Nonlinear conjugate gradient (Fletcher–Reeves).
    #[default]
    Nlcg,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::NewtonCg => write!(f, "newton-cg"),
            Method::Lbfgs => write!(f, "lbfgs"),
            Method::Nlcg => write!(f, "nlcg"),
        }
    }
}

/// Terminal state of the driver loop.
///
/// All three are ordinary outcomes reported to the caller; none maps to an
/// `Err`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    /// `f_k < tol * f0` was reached.
    Converged,
    /// The line search exhausted its trial budget without a Wolfe step.
    LineSearchFailed,
    /// The iteration cap was reached without convergence.
    MaxIterReached,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Converged => write!(f, "convergence reached"),
            Status::LineSearchFailed => write!(f, "line search failed"),
            Status::MaxIterReached => write!(f, "maximum iteration number reached"),
        }
    }
}

/// Per-iteration progress record handed to observers.
///
/// One record per accepted step: `iter fk fk/f0 ||gk|| alpha nls ngrad`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Outer iteration index (0-based).
    pub iter: usize,
    /// Objective value after the accepted step.
    pub fval: f64,
    /// Relative progress `fk / f0`.
    pub rel_decrease: f64,
    /// L2 norm of the gradient after the accepted step.
    pub grad_norm: f64,
    /// Accepted step length.
    pub alpha: f64,
    /// Objective evaluations spent by this iteration's line search.
    pub ls_evals: usize,
    /// Cumulative gradient evaluations for the run so far.
    pub grad_evals: usize,
}

/// Final report of a minimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimizeResult {
    /// Final iterate.
    pub x: Vec<f64>,
    /// Objective value at the final iterate.
    pub fval: f64,
    /// Objective value at the initial iterate (convergence reference).
    pub f0: f64,
    /// Gradient L2 norm at the final iterate.
    pub grad_norm: f64,
    /// Number of completed (accepted) outer iterations.
    pub n_iter: usize,
    /// Total objective/gradient evaluations.
    pub n_grad_evals: usize,
    /// Number of line searches performed.
    pub n_line_searches: usize,
    /// Terminal state of the driver loop.
    pub status: Status,
}

impl MinimizeResult {
    /// Whether the run ended in [`Status::Converged`].
    pub fn converged(&self) -> bool {
        self.status == Status::Converged
    }
}

impl fmt::Display for MinimizeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MinimizeResult(fval={:.6e}, fval/f0={:.3e}, n_iter={}, n_grad_evals={}, status={})",
            self.fval,
            self.fval / self.f0,
            self.n_iter,
            self.n_grad_evals,
            self.status
        )
    }
}
