//! partition-execution backends
//!
//! The driver issues one blocking accumulate-and-combine call per IRLS
//! iteration. A backend must visit every partition exactly once per pass and
//! combine all partial results before returning; the combine step is a pure
//! sum of immutable partials, so no locking is involved. Failures coming out
//! of a backend map to `GlmError::Execution` and abort the fit without
//! retries; retry policy belongs to the substrate, not the solver.

use crate::error::GlmResult;
use crate::frame::Frame;
use crate::gram::{accumulate_partition, AccumTask, GramStats};
use crate::num::Float;
use rayon::prelude::*;

/// How accumulation passes are executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backend {
    /// Folds partitions in order on the calling thread.
    Serial,
    /// Maps partitions across the rayon pool and sums the partials.
    #[default]
    Parallel,
}

impl Backend {
    /// Partition count used when the fit controls leave it at 0.
    pub fn default_partitions(&self) -> usize {
        match self {
            Backend::Serial => 1,
            Backend::Parallel => rayon::current_num_threads(),
        }
    }

    /// One full-dataset accumulation pass: split into `n_partitions` row
    /// ranges, run the task on each, combine by summation.
    pub fn accumulate<F: Float>(
        &self,
        frame: &Frame<F>,
        n_partitions: usize,
        task: &AccumTask<'_, F>,
    ) -> GlmResult<GramStats<F>> {
        let parts = frame.partitions(n_partitions);
        let p = task.design.n_coefs();
        let combined = match self {
            Backend::Serial => parts
                .iter()
                .fold(GramStats::zeros(p), |acc, part| {
                    acc.merge(accumulate_partition(part, task))
                }),
            Backend::Parallel => parts
                .par_iter()
                .map(|part| accumulate_partition(part, task))
                .reduce(|| GramStats::zeros(p), GramStats::merge),
        };
        Ok(combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::Design;
    use crate::family::Family;
    use crate::frame::{Column, Frame};
    use crate::irls::IrlsControl;
    use crate::link::Link;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn serial_and_parallel_agree() {
        let x = Array1::linspace(0.0, 9.0, 10);
        let y = x.mapv(|v: f64| 0.1 * v);
        let frame = Frame::new(vec![Column::numeric("x", x)], y).unwrap();
        let design = Design::new(&frame, true).unwrap();
        let control = IrlsControl::default();
        let beta = array![0.05, 0.02];
        let task = AccumTask {
            design: &design,
            family: Family::Gaussian,
            link: Link::Identity,
            beta: Some(&beta),
            control: &control,
        };
        let serial = Backend::Serial.accumulate(&frame, 1, &task).unwrap();
        let parallel = Backend::Parallel.accumulate(&frame, 4, &task).unwrap();
        assert_abs_diff_eq!(serial.xtx, parallel.xtx, epsilon = 1e-10);
        assert_abs_diff_eq!(serial.xtz, parallel.xtz, epsilon = 1e-10);
        assert_abs_diff_eq!(serial.deviance, parallel.deviance, epsilon = 1e-10);
        assert_eq!(serial.n_rows, parallel.n_rows);
    }
}
