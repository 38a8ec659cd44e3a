//! configuration errors and the non-convergence flag

use anyhow::Result;
use frame_glm::{fit_glm, Family, GlmError, IrlsControl};

mod common;
use common::{final_fit, request, xy_frame};

#[test]
fn gamma_rejects_non_positive_response() -> Result<()> {
    let frame = xy_frame(&[0.0, 1.0, 2.0], &[1.0, 0.0, 2.0])?;
    let err = fit_glm(&frame, &request(Family::Gamma)).unwrap_err();
    assert!(matches!(err, GlmError::Config(_)));
    assert!(err.to_string().contains("gamma"));
    Ok(())
}

#[test]
fn binomial_rejects_response_above_one() -> Result<()> {
    let frame = xy_frame(&[0.0, 1.0, 2.0], &[0.0, 1.0, 1.5])?;
    let err = fit_glm(&frame, &request(Family::Binomial)).unwrap_err();
    assert!(matches!(err, GlmError::Config(_)));
    Ok(())
}

#[test]
fn tweedie_power_outside_range_is_rejected() -> Result<()> {
    let frame = xy_frame(&[0.0, 1.0, 2.0], &[1.0, 2.0, 3.0])?;
    let family = Family::Tweedie {
        variance_power: 3.0,
    };
    let err = fit_glm(&frame, &request(family)).unwrap_err();
    assert!(matches!(err, GlmError::Config(_)));
    Ok(())
}

/// Exhausting the iteration budget is not an error: the best coefficients
/// are still returned, flagged as not fully converged.
#[test]
fn iteration_budget_exhaustion_is_non_fatal() -> Result<()> {
    let x: Vec<f64> = (0..8).map(|v| v as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| f64::powf(2.0, v + 1.0)).collect();
    let frame = xy_frame(&x, &y)?;
    let req = request(Family::Poisson).control(IrlsControl {
        max_iter: 2,
        ..IrlsControl::default()
    });
    let model = final_fit(&frame, &req)?;
    assert!(!model.converged());
    assert_eq!(model.n_iter(), 2);
    assert!(model.beta().iter().all(|b| b.is_finite()));
    Ok(())
}

/// Without an intercept the design drops the constant column.
#[test]
fn no_intercept_fit() -> Result<()> {
    let x: Vec<f64> = (1..=6).map(|v| v as f64).collect();
    let y: Vec<f64> = x.iter().map(|v| 0.3 * v).collect();
    let frame = xy_frame(&x, &y)?;
    let model = final_fit(&frame, &request(Family::Gaussian).no_intercept())?;
    assert_eq!(model.names(), ["x"]);
    assert!(model.coefficient("Intercept").is_none());
    approx::assert_abs_diff_eq!(model.coefficient("x").unwrap(), 0.3, epsilon = 1e-6);
    Ok(())
}
