//! elastic-net penalty state applied to the IRLS normal equations
//!
//! The penalty is held as per-coefficient L1 and L2 diagonals so the question
//! of which coefficients are exempt (the intercept) is settled once, at
//! construction, rather than re-litigated inside the solver.

use crate::error::{GlmError, GlmResult};
use crate::num::Float;
use ndarray::Array1;

/// Elastic-net penalty for one lambda along the path:
/// P(β) = Σ l1ⱼ·|βⱼ| + ½·Σ l2ⱼ·βⱼ², with l1 = λ·α and l2 = λ·(1−α) on every
/// penalized coefficient and zero on the intercept.
#[derive(Debug, Clone)]
pub struct Penalty<F: Float> {
    l1: Array1<F>,
    l2: Array1<F>,
}

impl<F: Float> Penalty<F> {
    /// Builds the diagonals, validating the regularization state. The
    /// intercept (coefficient 0 when present) is never penalized.
    pub fn new(alpha: F, lambda: F, n_coefs: usize, intercept: bool) -> GlmResult<Self> {
        if !alpha.is_finite() || alpha < F::zero() || alpha > F::one() {
            return Err(GlmError::Config(format!(
                "alpha must lie in [0, 1], got {}",
                alpha
            )));
        }
        if !lambda.is_finite() || lambda < F::zero() {
            return Err(GlmError::Config(format!(
                "lambda must be non-negative, got {}",
                lambda
            )));
        }
        let mut l1 = Array1::from_elem(n_coefs, lambda * alpha);
        let mut l2 = Array1::from_elem(n_coefs, lambda * (F::one() - alpha));
        if intercept && n_coefs > 0 {
            l1[0] = F::zero();
            l2[0] = F::zero();
        }
        Ok(Penalty { l1, l2 })
    }

    /// The absence of regularization.
    pub fn none(n_coefs: usize) -> Self {
        Penalty {
            l1: Array1::zeros(n_coefs),
            l2: Array1::zeros(n_coefs),
        }
    }

    pub(crate) fn has_l1(&self) -> bool {
        self.l1.iter().any(|v| *v > F::zero())
    }

    pub(crate) fn l1(&self) -> &Array1<F> {
        &self.l1
    }

    pub(crate) fn l2(&self) -> &Array1<F> {
        &self.l2
    }

    /// P(β).
    pub fn value(&self, beta: &Array1<F>) -> F {
        let half = F::from(0.5).unwrap();
        let l1_term = self
            .l1
            .iter()
            .zip(beta.iter())
            .fold(F::zero(), |acc, (&l, &b)| acc + l * num_traits::Float::abs(b));
        let l2_term = self
            .l2
            .iter()
            .zip(beta.iter())
            .fold(F::zero(), |acc, (&l, &b)| acc + l * b * b);
        l1_term + half * l2_term
    }

    /// The penalized deviance the driver monitors for monotonicity and
    /// convergence: D(β) + 2·P(β).
    pub(crate) fn objective(&self, deviance: F, beta: &Array1<F>) -> F {
        deviance + F::from(2.).unwrap() * self.value(beta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn intercept_is_exempt() {
        let pen: Penalty<f64> = Penalty::new(0.25, 2.0, 3, true).unwrap();
        assert_eq!(pen.l1()[0], 0.0);
        assert_eq!(pen.l2()[0], 0.0);
        assert_abs_diff_eq!(pen.l1()[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(pen.l2()[2], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn value_combines_both_terms() {
        let pen: Penalty<f64> = Penalty::new(0.5, 2.0, 2, false).unwrap();
        // l1 = l2 = 1 on both coefficients
        let beta = array![3.0, -4.0];
        assert_abs_diff_eq!(pen.value(&beta), 7.0 + 0.5 * 25.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_state_is_a_config_error() {
        assert!(Penalty::<f64>::new(-0.1, 1.0, 2, true).is_err());
        assert!(Penalty::<f64>::new(1.5, 1.0, 2, true).is_err());
        assert!(Penalty::<f64>::new(0.5, -1.0, 2, true).is_err());
    }

    #[test]
    fn no_penalty_leaves_the_objective_alone() {
        let pen: Penalty<f64> = Penalty::none(2);
        assert!(!pen.has_l1());
        assert_abs_diff_eq!(pen.objective(12.5, &array![1.0, 2.0]), 12.5, epsilon = 1e-12);
    }
}
