//! post-fit diagnostics: deviance baselines and AIC

use crate::design::Design;
use crate::error::GlmResult;
use crate::family::Family;
use crate::irls::{run_irls, FitContext, IrlsOutcome};
use crate::num::Float;
use crate::reg::Penalty;

/// Goodness-of-fit record computed once at fit completion and owned by the
/// fitted model.
#[derive(Debug, Clone)]
pub struct GlmValidation<F: Float> {
    /// Deviance of the intercept-only baseline, fit with the same family and
    /// link.
    pub null_deviance: F,
    /// Deviance of the full model at its final coefficients.
    pub residual_deviance: F,
    pub aic: F,
    pub n_rows: u64,
    /// n − 1.
    pub dof_total: u64,
    /// n − p.
    pub dof_residual: u64,
}

/// Fits the intercept-only baseline through the same driver and returns its
/// deviance. Regularization never applies to the baseline.
pub(crate) fn null_model_deviance<F: Float>(ctx: &FitContext<'_, F>) -> GlmResult<F> {
    let null_design = Design::intercept_only();
    let null_ctx = FitContext {
        design: &null_design,
        ..*ctx
    };
    let outcome = run_irls(&null_ctx, &Penalty::none(1), None)?;
    Ok(outcome.deviance)
}

pub(crate) fn validate<F: Float>(
    null_deviance: F,
    outcome: &IrlsOutcome<F>,
    family: Family<F>,
    n_coefs: usize,
) -> GlmValidation<F> {
    GlmValidation {
        null_deviance,
        residual_deviance: outcome.deviance,
        aic: aic(family, outcome.deviance, outcome.n_rows, n_coefs),
        n_rows: outcome.n_rows,
        dof_total: outcome.n_rows.saturating_sub(1),
        dof_residual: outcome.n_rows.saturating_sub(n_coefs as u64),
    }
}

/// AIC = residual deviance + 2·k for the families whose deviance is the
/// −2·log-likelihood shift; gaussian needs the residual-variance form because
/// its dispersion is estimated.
fn aic<F: Float>(family: Family<F>, deviance: F, n_rows: u64, n_coefs: usize) -> F {
    let two = F::from(2.).unwrap();
    let k = F::from(n_coefs).unwrap();
    match family {
        Family::Gaussian => {
            let n = F::from(n_rows).unwrap();
            let two_pi = F::from(std::f64::consts::TAU).unwrap();
            n * num_traits::Float::ln(two_pi * deviance / n) + n + two + two * k
        }
        _ => deviance + two * k,
    }
}
