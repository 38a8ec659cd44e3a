//! weighted least-squares inner solver
//!
//! Consumes the combined Gram system of one IRLS iteration and returns
//! updated coefficients, leaving the inputs untouched. Without an L1 weight
//! the augmented normal equations are solved by Cholesky factorization, with
//! a symmetric-indefinite solve as fallback on a failed factorization. Any L1
//! weight routes to cyclic coordinate descent with soft-threshold shrinkage,
//! which needs nothing beyond the Gram system itself.

use crate::error::{GlmError, GlmResult};
use crate::gram::GramStats;
use crate::irls::IrlsControl;
use crate::math::soft_threshold;
use crate::num::Float;
use crate::reg::Penalty;
use log::{debug, warn};
use ndarray::Array1;
use ndarray_linalg::{SolveC, SolveH};

pub(crate) fn solve_wls<F: Float>(
    stats: &GramStats<F>,
    penalty: &Penalty<F>,
    warm: &Array1<F>,
    control: &IrlsControl<F>,
) -> GlmResult<Array1<F>> {
    if penalty.has_l1() {
        coordinate_descent(stats, penalty, warm, control)
    } else {
        factorized_solve(stats, penalty)
    }
}

/// Solves (X'WX + diag(l2))·β = X'Wz.
fn factorized_solve<F: Float>(stats: &GramStats<F>, penalty: &Penalty<F>) -> GlmResult<Array1<F>> {
    let mut lhs = stats.xtx.clone();
    lhs.diag_mut()
        .zip_mut_with(penalty.l2(), |d, &l| *d = *d + l);
    let rhs = stats.xtz.clone();
    match lhs.solvec(&rhs) {
        Ok(next) => Ok(next),
        Err(_) => {
            // not positive definite; a pivoted symmetric solve still handles
            // the semi-definite cases a near-colinear column set produces
            warn!("cholesky factorization failed, falling back to symmetric indefinite solve");
            lhs.solveh_into(rhs).map_err(|e| {
                GlmError::Numerical(format!("normal equations singular beyond fallback: {}", e))
            })
        }
    }
}

/// Minimizes ½β'Gβ − r'β + Σ l1ⱼ|βⱼ| + ½Σ l2ⱼβⱼ² by coordinate sweeps,
/// warm-started from the caller's coefficients.
fn coordinate_descent<F: Float>(
    stats: &GramStats<F>,
    penalty: &Penalty<F>,
    warm: &Array1<F>,
    control: &IrlsControl<F>,
) -> GlmResult<Array1<F>> {
    let p = stats.n_coefs();
    let l1 = penalty.l1();
    let l2 = penalty.l2();
    let mut beta = warm.clone();
    for sweep in 0..control.inner_sweeps {
        let mut max_delta = F::zero();
        for j in 0..p {
            let curvature = stats.xtx[[j, j]] + l2[j];
            if curvature <= F::zero() {
                return Err(GlmError::Numerical(format!(
                    "coefficient {} has zero weighted variance",
                    j
                )));
            }
            let cross = stats.xtx.row(j).dot(&beta) - stats.xtx[[j, j]] * beta[j];
            let updated = soft_threshold(stats.xtz[j] - cross, l1[j]) / curvature;
            let delta = num_traits::Float::abs(updated - beta[j]);
            if delta > max_delta {
                max_delta = delta;
            }
            beta[j] = updated;
        }
        if max_delta <= control.inner_tol {
            debug!("coordinate descent converged after {} sweeps", sweep + 1);
            return Ok(beta);
        }
    }
    // budget exhaustion is not fatal; the outer line search decides whether
    // the partial solution still improves the objective
    warn!(
        "coordinate descent exhausted its budget of {} sweeps",
        control.inner_sweeps
    );
    Ok(beta)
}
