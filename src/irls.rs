//! outer IRLS driver: accumulate, solve, line-search, repeat
//!
//! The driver is plain single-threaded control flow. Each iteration issues
//! one blocking accumulation pass through the backend, hands the combined
//! statistics to the inner solver, and walks the penalized deviance
//! D(β) + 2·P(β) downhill, halving the step whenever a proposal overshoots.
//! Convergence is a relative change of that objective below `tol`; hitting
//! `max_iter` first is non-fatal and only clears the converged flag.

use crate::design::Design;
use crate::error::{GlmError, GlmResult};
use crate::exec::Backend;
use crate::family::Family;
use crate::frame::Frame;
use crate::gram::{AccumTask, GramStats};
use crate::link::Link;
use crate::num::Float;
use crate::reg::Penalty;
use crate::solve::solve_wls;
use log::{debug, warn};
use ndarray::Array1;

/// Tunable knobs of one fit. Every numeric guard the solver applies lives
/// here rather than as a scattered literal.
#[derive(Debug, Clone)]
pub struct IrlsControl<F: Float> {
    /// Outer iteration budget.
    pub max_iter: usize,
    /// Relative penalized-deviance change that counts as converged.
    pub tol: F,
    /// Domain guard for link/mean clamps.
    pub mean_eps: F,
    /// Floor for the IRLS weight of a single row.
    pub min_weight: F,
    /// Ceiling for the IRLS weight of a single row.
    pub max_weight: F,
    /// Line-search budget per iteration.
    pub max_step_halves: usize,
    /// Sweep budget of the coordinate-descent inner solver.
    pub inner_sweeps: usize,
    /// Maximum coefficient change at which a coordinate sweep stops.
    pub inner_tol: F,
    /// Row partitions per accumulation pass; 0 picks the backend default.
    pub partitions: usize,
}

impl<F: Float> Default for IrlsControl<F> {
    fn default() -> Self {
        Self {
            max_iter: 50,
            tol: F::from(1e-8).unwrap(),
            mean_eps: F::from(1e-10).unwrap(),
            min_weight: F::from(1e-10).unwrap(),
            max_weight: F::from(1e10).unwrap(),
            max_step_halves: 10,
            inner_sweeps: 1000,
            inner_tol: F::from(1e-10).unwrap(),
            partitions: 0,
        }
    }
}

/// Everything a fit reads but never mutates, shared by the driver, the path
/// manager and the null-model baseline.
#[derive(Clone, Copy)]
pub(crate) struct FitContext<'a, F: Float> {
    pub frame: &'a Frame<F>,
    pub design: &'a Design,
    pub family: Family<F>,
    pub link: Link,
    pub backend: &'a Backend,
    pub control: &'a IrlsControl<F>,
}

/// The terminal state of one driver run.
#[derive(Debug, Clone)]
pub(crate) struct IrlsOutcome<F: Float> {
    pub beta: Array1<F>,
    pub deviance: F,
    pub n_rows: u64,
    pub n_iter: usize,
    pub converged: bool,
}

fn combined_pass<F: Float>(
    ctx: &FitContext<'_, F>,
    n_parts: usize,
    beta: Option<&Array1<F>>,
) -> GlmResult<GramStats<F>> {
    let task = AccumTask {
        design: ctx.design,
        family: ctx.family,
        link: ctx.link,
        beta,
        control: ctx.control,
    };
    let stats = ctx.backend.accumulate(ctx.frame, n_parts, &task)?;
    if !stats.all_finite() {
        return Err(GlmError::Numerical(
            "accumulated statistics overflowed to non-finite values".to_string(),
        ));
    }
    Ok(stats)
}

/// Runs the driver to a terminal state. `warm` seeds the coefficients (a
/// previous lambda's solution); without it the first pass seeds the means
/// from the response.
pub(crate) fn run_irls<F: Float>(
    ctx: &FitContext<'_, F>,
    penalty: &Penalty<F>,
    warm: Option<&Array1<F>>,
) -> GlmResult<IrlsOutcome<F>> {
    let p = ctx.design.n_coefs();
    let n_parts = if ctx.control.partitions > 0 {
        ctx.control.partitions
    } else {
        ctx.backend.default_partitions()
    };
    let half = F::from(0.5).unwrap();

    let mut beta = match warm {
        Some(b) => b.clone(),
        None => Array1::zeros(p),
    };
    let mut stats = combined_pass(ctx, n_parts, warm.map(|_| &beta))?;
    // A cold start seeds the first pass from the response itself; that
    // baseline is not reachable by any coefficients, so it must not anchor
    // the line search. Only a warm start yields a comparable objective.
    let mut objective: Option<F> = warm.map(|_| penalty.objective(stats.deviance, &beta));

    let mut n_iter = 0;
    let mut converged = false;
    while n_iter < ctx.control.max_iter {
        n_iter += 1;
        let mut proposal = solve_wls(&stats, penalty, &beta, ctx.control)?;
        let mut next_stats = combined_pass(ctx, n_parts, Some(&proposal))?;
        let mut next_objective = penalty.objective(next_stats.deviance, &proposal);

        if let Some(obj) = objective {
            // step-halving line search toward the previous coefficients when
            // the proposal overshoots
            let mut halves = 0;
            while next_objective > obj && halves < ctx.control.max_step_halves {
                proposal.zip_mut_with(&beta, |x, &b| *x = (*x + b) * half);
                next_stats = combined_pass(ctx, n_parts, Some(&proposal))?;
                next_objective = penalty.objective(next_stats.deviance, &proposal);
                halves += 1;
            }
            let rel = num_traits::Float::abs(obj - next_objective)
                / (num_traits::Float::abs(obj) + F::epsilon());
            if next_objective > obj && rel > ctx.control.tol {
                // the step direction failed even after halving; keep the last
                // accepted coefficients
                warn!(
                    "iteration {}: no improving step after {} halvings",
                    n_iter, halves
                );
                break;
            }
            beta = proposal;
            stats = next_stats;
            objective = Some(next_objective);
            debug!(
                "iteration {}: objective {:?} (rel change {:?}, {} halvings)",
                n_iter, next_objective, rel, halves
            );
            if rel <= ctx.control.tol {
                converged = true;
                break;
            }
        } else {
            // first step of a cold start is always accepted
            beta = proposal;
            stats = next_stats;
            objective = Some(next_objective);
            debug!("iteration {}: objective {:?} (cold start)", n_iter, next_objective);
        }
    }
    if !converged {
        warn!(
            "fit did not fully converge within {} iterations",
            ctx.control.max_iter
        );
    }
    Ok(IrlsOutcome {
        beta,
        deviance: stats.deviance,
        n_rows: stats.n_rows,
        n_iter,
        converged,
    })
}
