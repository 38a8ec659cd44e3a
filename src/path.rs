//! regularization path: descending lambdas with warm-started refits
//!
//! Warm starting is explicit state: each converged coefficient vector is
//! passed as the seed of the next (smaller) lambda, nothing is carried
//! through hidden driver state.

use crate::error::{GlmError, GlmResult};
use crate::irls::{run_irls, FitContext, IrlsOutcome};
use crate::num::Float;
use crate::reg::Penalty;
use ndarray::Array1;

/// One fitted point along the path.
#[derive(Debug)]
pub(crate) struct LambdaFit<F: Float> {
    pub lambda: F,
    pub outcome: IrlsOutcome<F>,
}

/// Runs the driver once per lambda. The sequence must be strictly
/// decreasing, which is what makes the previous solution a sensible seed.
pub(crate) fn run_path<F: Float>(
    ctx: &FitContext<'_, F>,
    alpha: F,
    lambdas: &[F],
) -> GlmResult<Vec<LambdaFit<F>>> {
    if lambdas.is_empty() {
        return Err(GlmError::Config("empty lambda path".to_string()));
    }
    if let Some(w) = lambdas.windows(2).find(|w| w[1] >= w[0]) {
        return Err(GlmError::Config(format!(
            "lambda path must be strictly decreasing, got {} after {}",
            w[1], w[0]
        )));
    }
    let mut warm: Option<Array1<F>> = None;
    let mut fits = Vec::with_capacity(lambdas.len());
    for &lambda in lambdas {
        let penalty = Penalty::new(alpha, lambda, ctx.design.n_coefs(), ctx.design.intercept())?;
        let outcome = run_irls(ctx, &penalty, warm.as_ref())?;
        warm = Some(outcome.beta.clone());
        fits.push(LambdaFit { lambda, outcome });
    }
    Ok(fits)
}
