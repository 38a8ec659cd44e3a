//! Utility functions for testing
use anyhow::{anyhow, Result};
use frame_glm::{fit_glm, Column, Family, Frame, GlmModel, GlmRequest, Key, Link};
use ndarray::Array1;

/// Builds a single-predictor frame from x/y slices.
#[allow(dead_code)]
pub fn xy_frame(x: &[f64], y: &[f64]) -> Result<Frame<f64>> {
    Ok(Frame::new(
        vec![Column::numeric("x", Array1::from(x.to_vec()))],
        Array1::from(y.to_vec()),
    )?)
}

/// A request with throwaway keys for fits that never touch a store.
#[allow(dead_code)]
pub fn request(family: Family<f64>) -> GlmRequest<f64> {
    GlmRequest::new(Key::make("test_dest"), Key::make("test_src"), family)
}

/// Runs the request and returns the final (least penalized) model.
#[allow(dead_code)]
pub fn final_fit(frame: &Frame<f64>, req: &GlmRequest<f64>) -> Result<GlmModel<f64>> {
    fit_glm(frame, req)?
        .pop()
        .ok_or_else(|| anyhow!("fit produced no models"))
}

/// The x/y columns of the gaussian line scenario: y = 0.1·x over x = 0..9.
#[allow(dead_code)]
pub fn line_data() -> (Vec<f64>, Vec<f64>) {
    let x: Vec<f64> = (0..10).map(|v| v as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| 0.1 * v).collect();
    (x, y)
}

/// A 24-row saturated 3-level factor with positive rates ¼, ½ and ¾ per
/// level; the logistic MLE is known in closed form.
#[allow(dead_code)]
pub fn saturated_factor_frame() -> Result<Frame<f64>> {
    let mut labels = Vec::new();
    let mut y = Vec::new();
    for (level, positives) in [("a", 2), ("b", 4), ("c", 6)] {
        for i in 0..8 {
            labels.push(level);
            y.push(if i < positives { 1.0 } else { 0.0 });
        }
    }
    Ok(Frame::new(
        vec![Column::categorical("grade", &labels)],
        Array1::from(y),
    )?)
}

#[allow(dead_code)]
pub fn assert_link(model: &GlmModel<f64>, link: Link) {
    assert_eq!(model.link(), link);
}
