//! per-partition sufficient statistics and their associative combination
//!
//! One accumulation pass walks every row of a partition once, producing the
//! weighted Gram matrix X'WX, the weighted working response X'Wz and the
//! running deviance for the current coefficients. Partial results are
//! immutable values combined by elementwise summation, so partition order and
//! partition count never change the outcome beyond floating-point summation
//! order.

use crate::design::Design;
use crate::family::Family;
use crate::frame::FramePartition;
use crate::irls::IrlsControl;
use crate::link::Link;
use crate::num::Float;
use ndarray::{Array1, Array2};

/// Combined sufficient statistics of one accumulation pass. Owned exclusively
/// by the driver iteration that requested it and discarded after the inner
/// solve consumes it.
#[derive(Debug, Clone)]
pub struct GramStats<F: Float> {
    /// X'WX, symmetric p×p.
    pub xtx: Array2<F>,
    /// X'Wz.
    pub xtz: Array1<F>,
    /// Σ prior_weight · deviance(y, μ) at the coefficients of this pass.
    pub deviance: F,
    /// Σ prior_weight.
    pub weight_sum: F,
    /// Rows visited.
    pub n_rows: u64,
}

impl<F: Float> GramStats<F> {
    pub fn zeros(n_coefs: usize) -> Self {
        GramStats {
            xtx: Array2::zeros((n_coefs, n_coefs)),
            xtz: Array1::zeros(n_coefs),
            deviance: F::zero(),
            weight_sum: F::zero(),
            n_rows: 0,
        }
    }

    pub fn n_coefs(&self) -> usize {
        self.xtz.len()
    }

    /// Elementwise sum with another partial result. Associative and
    /// commutative, which is what lets the backend combine partials in any
    /// order.
    pub fn merge(mut self, other: GramStats<F>) -> GramStats<F> {
        self.xtx.zip_mut_with(&other.xtx, |a, &b| *a = *a + b);
        self.xtz.zip_mut_with(&other.xtz, |a, &b| *a = *a + b);
        self.deviance = self.deviance + other.deviance;
        self.weight_sum = self.weight_sum + other.weight_sum;
        self.n_rows += other.n_rows;
        self
    }

    pub(crate) fn all_finite(&self) -> bool {
        self.deviance.is_finite()
            && self.xtz.iter().all(|v| v.is_finite())
            && self.xtx.iter().all(|v| v.is_finite())
    }
}

/// Everything one partition pass needs, shared read-only across partitions.
#[derive(Clone, Copy)]
pub struct AccumTask<'a, F: Float> {
    pub design: &'a Design,
    pub family: Family<F>,
    pub link: Link,
    /// Current coefficients; `None` means a cold start, which seeds the means
    /// from the response instead of from η = x·0 (the inverse link cannot
    /// start from a zero predictor).
    pub beta: Option<&'a Array1<F>>,
    pub control: &'a IrlsControl<F>,
}

/// Runs one partition. Infallible: schema and response validation happened at
/// fit setup, and non-finite accumulation is caught by the driver on the
/// combined result.
pub fn accumulate_partition<F: Float>(
    part: &FramePartition<'_, F>,
    task: &AccumTask<'_, F>,
) -> GramStats<F> {
    let frame = part.frame();
    let p = task.design.n_coefs();
    let eps = task.control.mean_eps;
    let mut acc = GramStats::zeros(p);
    let mut xrow = vec![F::zero(); p];
    for row in part.rows() {
        task.design.fill_row(frame, row, &mut xrow);
        let y = frame.response()[row];
        let prior_w = frame.weight(row);
        let (eta, mu) = match task.beta {
            Some(beta) => {
                let eta = xrow
                    .iter()
                    .zip(beta.iter())
                    .fold(F::zero(), |dot, (&x, &b)| dot + x * b);
                (eta, task.family.clamp_mean(task.link.mean(eta, eps), eps))
            }
            None => {
                let mu = task.family.clamp_mean(task.family.initial_mean(y), eps);
                (task.link.func(mu), mu)
            }
        };
        let deriv = task.link.deriv(mu);
        let variance = task.family.variance(mu);
        // w = (dμ/dη)² / v(μ), bounded away from 0 and ∞
        let w_irls = num_traits::Float::recip(variance * deriv * deriv)
            .max(task.control.min_weight)
            .min(task.control.max_weight);
        let w = w_irls * prior_w;
        let z = eta + (y - mu) * deriv;
        for i in 0..p {
            acc.xtz[i] = acc.xtz[i] + w * xrow[i] * z;
            for j in i..p {
                acc.xtx[[i, j]] = acc.xtx[[i, j]] + w * xrow[i] * xrow[j];
            }
        }
        acc.deviance = acc.deviance + prior_w * task.family.deviance(y, mu);
        acc.weight_sum = acc.weight_sum + prior_w;
        acc.n_rows += 1;
    }
    // mirror the accumulated upper triangle
    for i in 0..p {
        for j in 0..i {
            acc.xtx[[i, j]] = acc.xtx[[j, i]];
        }
    }
    acc
}
