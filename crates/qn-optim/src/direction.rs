//! Search-direction strategies.
//!
//! One tagged variant per method instead of method flags threaded through
//! every function. Each variant owns exactly the state its update rule
//! needs: the L-BFGS variant carries the correction history plus the
//! previous iterate/gradient that extend it; the NLCG variant remembers
//! only the previous gradient and direction; Newton-CG is stateless apart
//! from its inner iteration cap.

use crate::history::CorrectionHistory;
use crate::lbfgs::two_loop_direction;
use crate::newton_cg::solve_newton_direction;
use crate::vecops::{dot, flip_sign};
use qn_core::{Method, Objective, Result};

/// Tagged search-direction strategy, created once per run.
pub struct DirectionStrategy {
    inner: Inner,
}

enum Inner {
    NewtonCg {
        max_inner: usize,
    },
    Lbfgs {
        history: CorrectionHistory,
        prev_x: Option<Vec<f64>>,
        prev_g: Option<Vec<f64>>,
    },
    Nlcg {
        prev_g: Option<Vec<f64>>,
        prev_d: Option<Vec<f64>>,
    },
}

impl DirectionStrategy {
    /// Strategy for `method` on an `n`-dimensional problem.
    ///
    /// `npair` sizes the L-BFGS memory; `ncg` caps Newton-CG inner
    /// iterations. Each is read only by its own method.
    pub fn new(method: Method, n: usize, npair: usize, ncg: usize) -> Self {
        let inner = match method {
            Method::NewtonCg => Inner::NewtonCg { max_inner: ncg },
            Method::Lbfgs => Inner::Lbfgs {
                history: CorrectionHistory::new(npair, n),
                prev_x: None,
                prev_g: None,
            },
            Method::Nlcg => Inner::Nlcg { prev_g: None, prev_d: None },
        };
        Self { inner }
    }

    /// Compute the next search direction at iterate `x` with gradient `g`.
    ///
    /// The L-BFGS variant first folds the step taken since the previous
    /// call into its correction history; pairs failing the curvature
    /// condition are discarded there. Only the Newton-CG variant calls
    /// back into the objective (for Hessian-vector products).
    pub fn compute(&mut self, objective: &dyn Objective, x: &[f64], g: &[f64]) -> Result<Vec<f64>> {
        match &mut self.inner {
            Inner::NewtonCg { max_inner } => solve_newton_direction(objective, x, g, *max_inner),
            Inner::Lbfgs { history, prev_x, prev_g } => {
                if let (Some(px), Some(pg)) = (prev_x.as_deref(), prev_g.as_deref()) {
                    let s: Vec<f64> = x.iter().zip(px).map(|(xi, pi)| xi - pi).collect();
                    let y: Vec<f64> = g.iter().zip(pg).map(|(gi, pi)| gi - pi).collect();
                    history.insert(&s, &y);
                }
                *prev_x = Some(x.to_vec());
                *prev_g = Some(g.to_vec());
                Ok(two_loop_direction(g, history))
            }
            Inner::Nlcg { prev_g, prev_d } => {
                let mut d = match (prev_g.as_deref(), prev_d.as_deref()) {
                    (Some(pg), Some(pd)) => {
                        let gg_prev = dot(pg, pg);
                        let beta = if gg_prev > 0.0 { dot(g, g) / gg_prev } else { 0.0 };
                        fletcher_reeves_direction(g, beta, pd)
                    }
                    // First iteration: no stored gradient.
                    _ => flip_sign(g),
                };
                // Fletcher–Reeves with a loose curvature constant can lose
                // the descent property; restart from steepest descent when
                // that happens.
                if dot(g, &d) >= 0.0 {
                    log::debug!("nlcg: restarting from steepest descent");
                    d = flip_sign(g);
                }
                *prev_g = Some(g.to_vec());
                *prev_d = Some(d.clone());
                Ok(d)
            }
        }
    }

    /// Number of correction pairs currently held (L-BFGS only, 0 otherwise).
    pub fn history_len(&self) -> usize {
        match &self.inner {
            Inner::Lbfgs { history, .. } => history.len(),
            _ => 0,
        }
    }
}

/// Fletcher–Reeves update `d = -g + beta * d_prev`.
fn fletcher_reeves_direction(g: &[f64], beta: f64, prev_d: &[f64]) -> Vec<f64> {
    g.iter().zip(prev_d).map(|(gi, di)| -gi + beta * di).collect()
}
