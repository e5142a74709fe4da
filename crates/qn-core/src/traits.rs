//! Capability traits for the minimization engine
//!
//! The engine sees the problem only through these traits: it calls the
//! objective synchronously and waits for a single `(f, g)` or `H·v`
//! result. The implementation behind the call may parallelize internally;
//! no shared mutable state crosses this boundary.

use crate::{Error, Result};

/// Objective function under minimization: `x -> (cost, gradient)`.
///
/// Implementations must be deterministic pure functions of `x` with
/// gradient output the same length as the input.
pub trait Objective: Send + Sync {
    /// Evaluate the objective at given parameters
    fn value(&self, x: &[f64]) -> Result<f64>;

    /// Compute gradient at given parameters (numerical if not overridden)
    fn gradient(&self, x: &[f64]) -> Result<Vec<f64>> {
        // Default: central differences with adaptive step size
        let n = x.len();
        let mut grad = vec![0.0; n];

        for i in 0..n {
            // Adaptive step size: eps = sqrt(machine_epsilon) * max(|x_i|, 1)
            let eps = 1e-8 * x[i].abs().max(1.0);

            // Forward step
            let mut x_plus = x.to_vec();
            x_plus[i] += eps;
            let f_plus = self.value(&x_plus)?;

            // Backward step
            let mut x_minus = x.to_vec();
            x_minus[i] -= eps;
            let f_minus = self.value(&x_minus)?;

            // Central difference
            grad[i] = (f_plus - f_minus) / (2.0 * eps);
        }

        Ok(grad)
    }

    /// Objective value and gradient in one call.
    ///
    /// This is the only entry point the engine uses, so objectives that
    /// share work between the two computations should override it.
    fn value_and_gradient(&self, x: &[f64]) -> Result<(f64, Vec<f64>)> {
        Ok((self.value(x)?, self.gradient(x)?))
    }

    /// Hessian-vector product `H(x)·v`, linear in `v` for fixed `x`.
    ///
    /// Required by the Newton-CG direction strategy; never called by the
    /// other strategies. The Hessian is never materialized.
    fn hessian_vector(&self, x: &[f64], v: &[f64]) -> Result<Vec<f64>> {
        let _ = (x, v);
        Err(Error::NotImplemented("Hessian-vector product".to_string()))
    }
}
