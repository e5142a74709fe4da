//! L-BFGS search direction via the two-loop recursion.

use crate::history::CorrectionHistory;
use crate::vecops::{dot, flip_sign};

/// Compute the L-BFGS descent direction `-H_k·g` without forming `H_k`.
///
/// Pairs are consumed strictly newest-first in the backward pass and
/// oldest-first in the forward pass; reversing either order breaks the
/// implicit inverse-Hessian identity. With no stored pairs this
/// degenerates to steepest descent, `-g`.
pub fn two_loop_direction(g: &[f64], history: &CorrectionHistory) -> Vec<f64> {
    let m = history.len();
    if m == 0 {
        return flip_sign(g);
    }

    let mut q = g.to_vec();
    let mut alpha = vec![0.0; m];

    // Backward pass: newest to oldest.
    for (k, (s, y, rho)) in history.iter_newest_first().enumerate() {
        let a = rho * dot(s, &q);
        alpha[m - 1 - k] = a;
        for (qj, yj) in q.iter_mut().zip(y.iter()) {
            *qj -= a * yj;
        }
    }

    // Initial inverse-Hessian scaling H0 = gamma * I from the newest pair.
    let s_new = history.s(m - 1);
    let y_new = history.y(m - 1);
    let yy = dot(y_new, y_new);
    let gamma = if yy > 1e-30 { dot(s_new, y_new) / yy } else { 1.0 };
    let mut r: Vec<f64> = q.iter().map(|&qi| gamma * qi).collect();

    // Forward pass: oldest to newest.
    for i in 0..m {
        let beta = history.rho(i) * dot(history.y(i), &r);
        let a = alpha[i];
        for (rj, sj) in r.iter_mut().zip(history.s(i).iter()) {
            *rj += (a - beta) * sj;
        }
    }

    flip_sign(&r)
}
