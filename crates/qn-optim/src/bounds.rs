//! Box constraints.
//!
//! Purely elementwise projection of the iterate into `[lo, hi]`; applied
//! only when bounds are enabled, with no side effect beyond the clipped
//! vector itself.

use qn_core::{Error, Result};

/// Clip `x` into the box, elementwise.
pub fn clip(x: &[f64], bounds: &[(f64, f64)]) -> Vec<f64> {
    x.iter().zip(bounds.iter()).map(|(&v, &(lo, hi))| v.clamp(lo, hi)).collect()
}

/// Validate a bounds slice against problem dimension `n`.
///
/// Rejects length mismatches and any interval with `lo > hi` (or a
/// non-finite ordering, e.g. NaN endpoints).
pub fn validate(bounds: &[(f64, f64)], n: usize) -> Result<()> {
    if bounds.len() != n {
        return Err(Error::Validation(format!(
            "bounds length mismatch: {} != {}",
            bounds.len(),
            n
        )));
    }
    for (i, &(lo, hi)) in bounds.iter().enumerate() {
        if !(lo <= hi) {
            return Err(Error::Validation(format!("invalid bounds at index {i}: [{lo}, {hi}]")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{clip, validate};
    use qn_core::Error;

    #[test]
    fn clip_is_elementwise() {
        let x = [-1.0, 0.5, 3.0];
        let bounds = [(0.0, 2.0), (0.0, 2.0), (0.0, 2.0)];
        assert_eq!(clip(&x, &bounds), vec![0.0, 0.5, 2.0]);
    }

    #[test]
    fn interior_points_pass_through() {
        let x = [1.0, 1.5];
        let bounds = [(0.0, 2.0), (0.0, 2.0)];
        assert_eq!(clip(&x, &bounds), x.to_vec());
    }

    #[test]
    fn validate_rejects_length_mismatch() {
        let res = validate(&[(0.0, 1.0)], 2);
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[test]
    fn validate_rejects_inverted_interval() {
        let res = validate(&[(1.0, 0.0)], 1);
        assert!(matches!(res, Err(Error::Validation(_))));
    }

    #[test]
    fn validate_rejects_nan_endpoint() {
        let res = validate(&[(f64::NAN, 1.0)], 1);
        assert!(matches!(res, Err(Error::Validation(_))));
    }
}
