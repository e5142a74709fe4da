//! Truncated-Newton inner solver.
//!
//! Approximately solves the Newton system `H(x)·d = -g` by the linear
//! conjugate-gradient method, with the Hessian applied only through the
//! objective's Hessian-vector capability — `H` is never materialized.

use crate::vecops::{dot, flip_sign, norm_l2};
use qn_core::{Error, Objective, Result};

/// Approximately solve `H(x)·d = -g` with at most `max_inner` CG iterations.
///
/// Non-positive curvature (`p·Hp <= 0`) truncates the solve and returns the
/// best direction found so far; if the very first direction already has
/// non-positive curvature, the steepest-descent direction `-g` is returned.
pub fn solve_newton_direction(
    objective: &dyn Objective,
    x: &[f64],
    g: &[f64],
    max_inner: usize,
) -> Result<Vec<f64>> {
    let n = g.len();
    let mut d = vec![0.0; n];
    // Residual of H·d + g at d = 0.
    let mut r = flip_sign(g);
    let mut p = r.clone();
    let mut rr = dot(&r, &r);

    // Inner stop on a machine-level relative residual; the hard cap
    // `max_inner` is what actually truncates in practice.
    let r_stop = 1e-10 * norm_l2(g);

    for inner in 0..max_inner {
        let hp = objective.hessian_vector(x, &p)?;
        if hp.len() != n {
            return Err(Error::Computation(format!(
                "Hessian-vector product length {} does not match dimension {}",
                hp.len(),
                n
            )));
        }

        let php = dot(&p, &hp);
        if php <= 0.0 {
            // Negative curvature: standard truncated-Newton safeguard.
            log::debug!("newton-cg: negative curvature at inner iteration {inner}, truncating");
            if inner == 0 {
                return Ok(p);
            }
            return Ok(d);
        }

        let step = rr / php;
        for j in 0..n {
            d[j] += step * p[j];
            r[j] -= step * hp[j];
        }

        let rr_next = dot(&r, &r);
        if rr_next.sqrt() <= r_stop {
            break;
        }
        let beta = rr_next / rr;
        for j in 0..n {
            p[j] = r[j] + beta * p[j];
        }
        rr = rr_next;
    }

    Ok(d)
}
