//! caller-facing fit requests and fitted models
//!
//! A request names a destination key, a source frame and the statistical
//! settings; `run_glm` resolves the frame, fits, and publishes the final
//! model. `fit_glm` is the same engine against a frame in hand, returning
//! every point of the lambda path.

use crate::design::Design;
use crate::error::{GlmError, GlmResult};
use crate::exec::Backend;
use crate::family::Family;
use crate::frame::Frame;
use crate::irls::{FitContext, IrlsControl};
use crate::link::Link;
use crate::num::Float;
use crate::path::{run_path, LambdaFit};
use crate::store::{Key, Store};
use crate::validation::{null_model_deviance, validate, GlmValidation};
use log::info;
use ndarray::Array1;

/// Specification of one fit. Built with `new` plus the chained setters; the
/// defaults are an unregularized fit with an intercept and the family's
/// default link.
#[derive(Debug, Clone)]
pub struct GlmRequest<F: Float> {
    description: String,
    dest: Key,
    source: Key,
    intercept: bool,
    family: Family<F>,
    link: Option<Link>,
    alpha: F,
    lambdas: Vec<F>,
    control: IrlsControl<F>,
    backend: Backend,
}

impl<F: Float> GlmRequest<F> {
    pub fn new(dest: Key, source: Key, family: Family<F>) -> Self {
        GlmRequest {
            description: String::new(),
            dest,
            source,
            intercept: true,
            family,
            link: None,
            alpha: F::zero(),
            lambdas: Vec::new(),
            control: IrlsControl::default(),
            backend: Backend::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Overrides the family's default link.
    pub fn link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    /// Do not add the constant term to the design.
    pub fn no_intercept(mut self) -> Self {
        self.intercept = false;
        self
    }

    /// L1/L2 mixing parameter of the elastic net; 0 is pure ridge, 1 pure
    /// lasso.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.alpha = alpha;
        self
    }

    /// A single penalty strength.
    pub fn lambda(mut self, lambda: F) -> Self {
        self.lambdas = vec![lambda];
        self
    }

    /// A strictly decreasing sequence of penalty strengths, each fit
    /// warm-started from the previous solution.
    pub fn lambda_path(mut self, lambdas: Vec<F>) -> Self {
        self.lambdas = lambdas;
        self
    }

    pub fn control(mut self, control: IrlsControl<F>) -> Self {
        self.control = control;
        self
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

/// A fitted model: the converged coefficients with their schema-ordered
/// names, the settings that produced them and the diagnostics snapshot.
/// Immutable once published.
#[derive(Debug, Clone)]
pub struct GlmModel<F: Float> {
    description: String,
    family: Family<F>,
    link: Link,
    alpha: F,
    lambda: F,
    names: Vec<String>,
    beta: Array1<F>,
    validation: GlmValidation<F>,
    converged: bool,
    n_iter: usize,
}

impl<F: Float> GlmModel<F> {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn family(&self) -> Family<F> {
        self.family
    }

    pub fn link(&self) -> Link {
        self.link
    }

    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn lambda(&self) -> F {
        self.lambda
    }

    /// The full coefficient vector in schema order (intercept first when
    /// present).
    pub fn beta(&self) -> &Array1<F> {
        &self.beta
    }

    /// Coefficient names in the same order as `beta`: "Intercept", numeric
    /// column names, and "<column>.<level>" for expanded categoricals.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Looks a coefficient up by name.
    pub fn coefficient(&self, name: &str) -> Option<F> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.beta[i])
    }

    /// All (name, value) pairs in schema order.
    pub fn coefficients(&self) -> Vec<(String, F)> {
        self.names
            .iter()
            .cloned()
            .zip(self.beta.iter().copied())
            .collect()
    }

    pub fn validation(&self) -> &GlmValidation<F> {
        &self.validation
    }

    /// False when the iteration budget ran out first; the coefficients are
    /// still the best ones found.
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn n_iter(&self) -> usize {
        self.n_iter
    }
}

/// Fits the request against a frame in hand. Returns one model per lambda in
/// path order; the last entry is the final (least penalized) fit.
pub fn fit_glm<F: Float>(frame: &Frame<F>, request: &GlmRequest<F>) -> GlmResult<Vec<GlmModel<F>>> {
    request.family.validate()?;
    let link = request.link.unwrap_or_else(|| request.family.default_link());
    if !request.family.supports_link(link) {
        return Err(GlmError::Config(format!(
            "family {} cannot be fit with the {} link",
            request.family, link
        )));
    }
    if let Some(bad) = frame
        .response()
        .iter()
        .find(|y| !request.family.valid_response(**y))
    {
        return Err(GlmError::Config(format!(
            "response value {} lies outside the {} domain",
            bad, request.family
        )));
    }
    let design = Design::new(frame, request.intercept)?;
    if frame.n_rows() < design.n_coefs() {
        return Err(GlmError::Config(format!(
            "underconstrained: {} rows for {} coefficients",
            frame.n_rows(),
            design.n_coefs()
        )));
    }
    let ctx = FitContext {
        frame,
        design: &design,
        family: request.family,
        link,
        backend: &request.backend,
        control: &request.control,
    };
    let null_deviance = null_model_deviance(&ctx)?;
    let lambdas = if request.lambdas.is_empty() {
        vec![F::zero()]
    } else {
        request.lambdas.clone()
    };
    let fits = run_path(&ctx, request.alpha, &lambdas)?;
    let models = fits
        .into_iter()
        .map(|LambdaFit { lambda, outcome }| {
            let validation = validate(null_deviance, &outcome, request.family, design.n_coefs());
            GlmModel {
                description: request.description.clone(),
                family: request.family,
                link,
                alpha: request.alpha,
                lambda,
                names: design.names().to_vec(),
                beta: outcome.beta,
                validation,
                converged: outcome.converged,
                n_iter: outcome.n_iter,
            }
        })
        .collect();
    Ok(models)
}

/// Resolves the source frame, fits, and publishes the final model at the
/// destination key, which is returned as the retrieval handle. Nothing is
/// published when the fit fails.
pub fn run_glm<F: Float>(
    request: &GlmRequest<F>,
    frames: &Store<Frame<F>>,
    models: &Store<GlmModel<F>>,
) -> GlmResult<Key> {
    let frame = frames.get(&request.source).ok_or_else(|| {
        GlmError::Config(format!(
            "no frame published under key '{}'",
            request.source
        ))
    })?;
    let mut fits = fit_glm(frame.as_ref(), request)?;
    let last = fits
        .pop()
        .ok_or_else(|| GlmError::Numerical("path produced no fits".to_string()))?;
    info!(
        "publishing {} model '{}' at key '{}' ({} coefficients, converged: {})",
        last.family,
        request.description,
        request.dest,
        last.beta.len(),
        last.converged
    );
    Ok(models.publish(request.dest.clone(), last))
}
