//! frozen design: categorical expansion and stable coefficient ordering
//!
//! The design is computed once at fit setup and never changes during a fit,
//! so coefficient indexing stays identical across every partition and every
//! IRLS iteration. Categorical columns are one-hot expanded against a dropped
//! reference level (the first level of the domain).

use crate::error::{GlmError, GlmResult};
use crate::frame::{Column, Frame};
use crate::num::Float;

/// What one coefficient multiplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Term {
    /// The implicit constant-1 feature.
    Intercept,
    /// The value of a numeric column.
    Numeric { col: usize },
    /// The indicator of one non-reference level of a categorical column.
    Level { col: usize, level: u32 },
}

/// The expanded coefficient basis of one fit.
#[derive(Debug, Clone)]
pub struct Design {
    terms: Vec<Term>,
    names: Vec<String>,
    intercept: bool,
}

impl Design {
    /// Expands the frame schema into the coefficient basis. The intercept (if
    /// requested) occupies index 0; columns follow in frame order, with each
    /// categorical contributing one indicator per non-reference level.
    ///
    /// Every categorical code is validated against its level domain here so a
    /// schema mismatch surfaces before any accumulation pass runs.
    pub fn new<F: Float>(frame: &Frame<F>, intercept: bool) -> GlmResult<Self> {
        let mut terms = Vec::new();
        let mut names = Vec::new();
        if intercept {
            terms.push(Term::Intercept);
            names.push("Intercept".to_string());
        }
        for (col_idx, col) in frame.columns().iter().enumerate() {
            match col {
                Column::Numeric { name, .. } => {
                    terms.push(Term::Numeric { col: col_idx });
                    names.push(name.clone());
                }
                Column::Categorical {
                    name,
                    levels,
                    codes,
                } => {
                    if levels.is_empty() {
                        return Err(GlmError::Config(format!(
                            "categorical column '{}' has an empty level domain",
                            name
                        )));
                    }
                    if let Some(bad) = codes.iter().find(|&&c| c as usize >= levels.len()) {
                        return Err(GlmError::Config(format!(
                            "column '{}' holds level code {} outside its domain of {} levels",
                            name,
                            bad,
                            levels.len()
                        )));
                    }
                    // reference level 0 is dropped
                    for (level_idx, level) in levels.iter().enumerate().skip(1) {
                        terms.push(Term::Level {
                            col: col_idx,
                            level: level_idx as u32,
                        });
                        names.push(format!("{}.{}", name, level));
                    }
                }
            }
        }
        if terms.is_empty() {
            return Err(GlmError::Config(
                "design is empty: no intercept and no expandable predictors".to_string(),
            ));
        }
        Ok(Design {
            terms,
            names,
            intercept,
        })
    }

    /// The design of the intercept-only baseline used for the null deviance.
    pub(crate) fn intercept_only() -> Self {
        Design {
            terms: vec![Term::Intercept],
            names: vec!["Intercept".to_string()],
            intercept: true,
        }
    }

    pub fn n_coefs(&self) -> usize {
        self.terms.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn intercept(&self) -> bool {
        self.intercept
    }

    /// Writes one expanded row into `out` (length `n_coefs`). The frame must
    /// be the one the design was built from.
    pub(crate) fn fill_row<F: Float>(&self, frame: &Frame<F>, row: usize, out: &mut [F]) {
        for (slot, term) in out.iter_mut().zip(&self.terms) {
            *slot = match *term {
                Term::Intercept => F::one(),
                Term::Numeric { col } => match &frame.columns()[col] {
                    Column::Numeric { values, .. } => values[row],
                    Column::Categorical { .. } => {
                        unreachable!("design term does not match frame schema")
                    }
                },
                Term::Level { col, level } => match &frame.columns()[col] {
                    Column::Categorical { codes, .. } => {
                        if codes[row] == level {
                            F::one()
                        } else {
                            F::zero()
                        }
                    }
                    Column::Numeric { .. } => {
                        unreachable!("design term does not match frame schema")
                    }
                },
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{Column, Frame};
    use ndarray::array;

    fn mixed_frame() -> Frame<f64> {
        Frame::new(
            vec![
                Column::numeric("x", array![1.5, 2.5, 3.5]),
                Column::categorical("g", &["b", "a", "c"]),
            ],
            array![1., 2., 3.],
        )
        .unwrap()
    }

    #[test]
    fn expansion_order_and_names() {
        let design = Design::new(&mixed_frame(), true).unwrap();
        assert_eq!(design.n_coefs(), 4);
        assert_eq!(design.names(), ["Intercept", "x", "g.b", "g.c"]);
    }

    #[test]
    fn reference_level_rows_expand_to_zeros() {
        let frame = mixed_frame();
        let design = Design::new(&frame, true).unwrap();
        let mut row = vec![0.0; design.n_coefs()];
        // row 1 holds level "a", the reference
        design.fill_row(&frame, 1, &mut row);
        assert_eq!(row, vec![1.0, 2.5, 0.0, 0.0]);
        // row 0 holds level "b"
        design.fill_row(&frame, 0, &mut row);
        assert_eq!(row, vec![1.0, 1.5, 1.0, 0.0]);
        // row 2 holds level "c"
        design.fill_row(&frame, 2, &mut row);
        assert_eq!(row, vec![1.0, 3.5, 0.0, 1.0]);
    }

    #[test]
    fn out_of_domain_code_is_a_config_error() {
        let frame = Frame::new(
            vec![Column::with_levels(
                "g",
                vec!["a".to_string(), "b".to_string()],
                vec![0, 1, 7],
            )],
            array![1., 2., 3.],
        )
        .unwrap();
        let err = Design::new(&frame, true).unwrap_err();
        assert!(matches!(err, GlmError::Config(_)));
        assert!(err.to_string().contains("level code"));
    }

    #[test]
    fn no_intercept_drops_the_leading_column() {
        let design = Design::new(&mixed_frame(), false).unwrap();
        assert_eq!(design.names(), ["x", "g.b", "g.c"]);
        assert!(!design.intercept());
    }

    #[test]
    fn empty_design_is_rejected() {
        let frame: Frame<f64> = Frame::new(vec![], array![1., 2.]).unwrap();
        assert!(Design::new(&frame, false).is_err());
    }
}
