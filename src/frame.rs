//! columnar dataset view consumed by the solver
//!
//! The solver never parses raw input; it is handed a `Frame` of typed
//! predictor columns plus a response, and splits it into contiguous row
//! partitions for the accumulation passes. A frame is immutable for the
//! duration of every fit that reads it.

use crate::error::{GlmError, GlmResult};
use crate::num::Float;
use itertools::Itertools;
use ndarray::Array1;
use std::ops::Range;

/// A single named predictor column. Categorical columns carry their full
/// level domain and per-row level codes; the code-to-level mapping is part of
/// the schema and must be identical across all partitions.
#[derive(Debug, Clone)]
pub enum Column<F: Float> {
    Numeric {
        name: String,
        values: Array1<F>,
    },
    Categorical {
        name: String,
        levels: Vec<String>,
        codes: Vec<u32>,
    },
}

impl<F: Float> Column<F> {
    pub fn numeric(name: impl Into<String>, values: Array1<F>) -> Self {
        Column::Numeric {
            name: name.into(),
            values,
        }
    }

    /// Builds a categorical column from raw labels. The level domain is the
    /// sorted set of distinct labels, so the reference level (index 0) is the
    /// lexicographically smallest, independent of row order.
    pub fn categorical(name: impl Into<String>, labels: &[&str]) -> Self {
        let levels: Vec<String> = labels
            .iter()
            .sorted()
            .dedup()
            .map(|s| s.to_string())
            .collect();
        let codes = labels
            .iter()
            .map(|l| {
                // binary_search cannot fail: every label is in the domain
                levels.binary_search(&l.to_string()).unwrap_or(0) as u32
            })
            .collect();
        Column::Categorical {
            name: name.into(),
            levels,
            codes,
        }
    }

    /// Builds a categorical column from an explicit level domain and codes,
    /// the form a parsed dataset arrives in. Codes are validated against the
    /// domain at design setup, not here.
    pub fn with_levels(name: impl Into<String>, levels: Vec<String>, codes: Vec<u32>) -> Self {
        Column::Categorical {
            name: name.into(),
            levels,
            codes,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Column::Numeric { name, .. } => name,
            Column::Categorical { name, .. } => name,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric { values, .. } => values.len(),
            Column::Categorical { codes, .. } => codes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An immutable columnar dataset: predictor columns, a response and optional
/// prior row weights.
#[derive(Debug, Clone)]
pub struct Frame<F: Float> {
    columns: Vec<Column<F>>,
    response: Array1<F>,
    weights: Option<Array1<F>>,
}

impl<F: Float> Frame<F> {
    pub fn new(columns: Vec<Column<F>>, response: Array1<F>) -> GlmResult<Self> {
        let n = response.len();
        if n == 0 {
            return Err(GlmError::Config("frame has no rows".to_string()));
        }
        for col in &columns {
            if col.len() != n {
                return Err(GlmError::Config(format!(
                    "column '{}' has {} rows but the response has {}",
                    col.name(),
                    col.len(),
                    n
                )));
            }
        }
        if let Some(dup) = columns.iter().map(Column::name).duplicates().next() {
            return Err(GlmError::Config(format!(
                "duplicate predictor column '{}'",
                dup
            )));
        }
        Ok(Frame {
            columns,
            response,
            weights: None,
        })
    }

    /// Attaches prior observation weights. Weights must be non-negative and
    /// finite; a zero weight removes the row from the fit without removing it
    /// from the frame.
    pub fn with_weights(mut self, weights: Array1<F>) -> GlmResult<Self> {
        if weights.len() != self.response.len() {
            return Err(GlmError::Config(format!(
                "weights have {} entries but the frame has {} rows",
                weights.len(),
                self.response.len()
            )));
        }
        if weights.iter().any(|w| !w.is_finite() || *w < F::zero()) {
            return Err(GlmError::Config(
                "weights must be finite and non-negative".to_string(),
            ));
        }
        self.weights = Some(weights);
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.response.len()
    }

    pub fn columns(&self) -> &[Column<F>] {
        &self.columns
    }

    pub fn response(&self) -> &Array1<F> {
        &self.response
    }

    /// The prior weight of one row; 1 when no weights are attached.
    pub fn weight(&self, row: usize) -> F {
        match &self.weights {
            Some(w) => w[row],
            None => F::one(),
        }
    }

    /// Splits the frame into `n` contiguous, non-overlapping row ranges
    /// covering every row exactly once. `n` is clamped to the row count.
    pub fn partitions(&self, n: usize) -> Vec<FramePartition<'_, F>> {
        let rows = self.n_rows();
        let n = n.clamp(1, rows);
        let base = rows / n;
        let extra = rows % n;
        let mut parts = Vec::with_capacity(n);
        let mut start = 0;
        for i in 0..n {
            let len = base + usize::from(i < extra);
            parts.push(FramePartition {
                frame: self,
                rows: start..start + len,
            });
            start += len;
        }
        parts
    }
}

/// One contiguous row range of a frame; the unit of work handed to the
/// partition backend.
#[derive(Debug, Clone)]
pub struct FramePartition<'a, F: Float> {
    frame: &'a Frame<F>,
    rows: Range<usize>,
}

impl<'a, F: Float> FramePartition<'a, F> {
    pub fn frame(&self) -> &'a Frame<F> {
        self.frame
    }

    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }
}
