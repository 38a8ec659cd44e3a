//! response families: variance structure, deviance and response-domain checks

use crate::error::{GlmError, GlmResult};
use crate::link::Link;
use crate::math::prod_log;
use crate::num::Float;
use std::fmt;

/// The response distribution of a fit. A closed set of variants, each
/// supplying the handful of pure functions IRLS needs; adding a family means
/// adding one variant and its arms here.
///
/// Tweedie carries its variance power p, with Var(Y) ∝ μ^p. The deviance
/// branches exactly at p = 1 (Poisson form) and p = 2 (Gamma form).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Family<F: Float> {
    Gaussian,
    Binomial,
    Poisson,
    Gamma,
    Tweedie { variance_power: F },
}

impl<F: Float> Family<F> {
    pub fn name(self) -> &'static str {
        match self {
            Family::Gaussian => "gaussian",
            Family::Binomial => "binomial",
            Family::Poisson => "poisson",
            Family::Gamma => "gamma",
            Family::Tweedie { .. } => "tweedie",
        }
    }

    /// The canonical-ish default link used when a request leaves the link
    /// unspecified.
    pub fn default_link(self) -> Link {
        match self {
            Family::Gaussian => Link::Identity,
            Family::Binomial => Link::Logit,
            Family::Poisson => Link::Log,
            Family::Gamma => Link::Inverse,
            Family::Tweedie { .. } => Link::Log,
        }
    }

    /// Which links a family can be fit with.
    pub fn supports_link(self, link: Link) -> bool {
        match self {
            Family::Gaussian => matches!(link, Link::Identity | Link::Log | Link::Inverse),
            Family::Binomial => matches!(link, Link::Logit | Link::Log),
            Family::Poisson => matches!(link, Link::Log | Link::Identity),
            Family::Gamma => matches!(link, Link::Inverse | Link::Log | Link::Identity),
            Family::Tweedie { .. } => matches!(link, Link::Log),
        }
    }

    /// Checks family parameters that arrive from a request. The tweedie
    /// variance power is restricted to the compound Poisson-Gamma range
    /// [1, 2]; outside it the deviance below is not the right expression for
    /// a zero-inflated response.
    pub fn validate(self) -> GlmResult<()> {
        if let Family::Tweedie { variance_power } = self {
            if variance_power < F::one() || variance_power > F::from(2.).unwrap() {
                return Err(GlmError::Config(format!(
                    "tweedie variance power must lie in [1, 2], got {}",
                    variance_power
                )));
            }
        }
        Ok(())
    }

    /// The variance function v(μ).
    pub fn variance(self, mu: F) -> F {
        match self {
            Family::Gaussian => F::one(),
            Family::Binomial => mu * (F::one() - mu),
            Family::Poisson => mu,
            Family::Gamma => mu * mu,
            Family::Tweedie { variance_power } => num_traits::Float::powf(mu, variance_power),
        }
    }

    /// The unit deviance contribution of one observation.
    pub fn deviance(self, y: F, mu: F) -> F {
        let one = F::one();
        let two = F::from(2.).unwrap();
        match self {
            Family::Gaussian => {
                let r = y - mu;
                r * r
            }
            Family::Binomial => {
                // prod_log handles the y = 0 and y = 1 endpoints
                let t = prod_log(y) - y * num_traits::Float::ln(mu) + prod_log(one - y)
                    - (one - y) * num_traits::Float::ln(one - mu);
                two * t
            }
            Family::Poisson => two * (prod_log(y) - y * num_traits::Float::ln(mu) - (y - mu)),
            Family::Gamma => {
                two * (num_traits::Float::ln(mu / y) + (y - mu) / mu)
            }
            Family::Tweedie { variance_power } => {
                let p = variance_power;
                if p == one {
                    two * (prod_log(y) - y * num_traits::Float::ln(mu) - (y - mu))
                } else if p == two {
                    two * (num_traits::Float::ln(mu / y) + (y - mu) / mu)
                } else {
                    let omp = one - p;
                    let tmp = two - p;
                    two * (num_traits::Float::powf(y, tmp) / (omp * tmp)
                        - y * num_traits::Float::powf(mu, omp) / omp
                        + num_traits::Float::powf(mu, tmp) / tmp)
                }
            }
        }
    }

    /// Seed mean for the first IRLS pass of a cold-started fit. Mirrors the
    /// usual mustart choices: the response itself for gaussian, pulled toward
    /// ½ for binomial, floored and shifted off zero for the positive
    /// families so log and inverse links start finite.
    pub fn initial_mean(self, y: F) -> F {
        match self {
            Family::Gaussian => y,
            Family::Binomial => (y + F::from(0.5).unwrap()) * F::from(0.5).unwrap(),
            Family::Poisson | Family::Gamma | Family::Tweedie { .. } => {
                y.max(F::zero()) + F::from(0.1).unwrap()
            }
        }
    }

    /// Clamps a mean into the family domain before it reaches the variance
    /// function or the link derivative.
    pub fn clamp_mean(self, mu: F, eps: F) -> F {
        match self {
            Family::Gaussian => mu,
            Family::Binomial => mu.max(eps).min(F::one() - eps),
            Family::Poisson | Family::Gamma | Family::Tweedie { .. } => mu.max(eps),
        }
    }

    /// Whether a response value lies in the family domain. A violation is a
    /// configuration error raised before any accumulation pass.
    pub fn valid_response(self, y: F) -> bool {
        if !y.is_finite() {
            return false;
        }
        match self {
            Family::Gaussian => true,
            Family::Binomial => y >= F::zero() && y <= F::one(),
            Family::Poisson | Family::Tweedie { .. } => y >= F::zero(),
            Family::Gamma => y > F::zero(),
        }
    }
}

impl<F: Float> fmt::Display for Family<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Tweedie { variance_power } => write!(f, "tweedie(p={})", variance_power),
            other => write!(f, "{}", other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn tweedie_deviance_reduces_to_poisson_and_gamma() {
        let p1 = Family::Tweedie { variance_power: 1.0 };
        let p2 = Family::Tweedie { variance_power: 2.0 };
        for &(y, mu) in &[(0.0, 0.5), (1.0, 0.8), (3.0, 2.5), (10.0, 12.0)] {
            assert_abs_diff_eq!(
                p1.deviance(y, mu),
                Family::<f64>::Poisson.deviance(y, mu),
                epsilon = 1e-12
            );
            if y > 0.0 {
                assert_abs_diff_eq!(
                    p2.deviance(y, mu),
                    Family::<f64>::Gamma.deviance(y, mu),
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn tweedie_power_range_is_validated() {
        assert!(Family::Tweedie { variance_power: 1.5_f64 }.validate().is_ok());
        assert!(Family::Tweedie { variance_power: 0.5_f64 }.validate().is_err());
        assert!(Family::Tweedie { variance_power: 2.5_f64 }.validate().is_err());
    }

    #[test]
    fn default_links() {
        assert_eq!(Family::<f64>::Gaussian.default_link(), Link::Identity);
        assert_eq!(Family::<f64>::Binomial.default_link(), Link::Logit);
        assert_eq!(Family::<f64>::Poisson.default_link(), Link::Log);
        assert_eq!(Family::<f64>::Gamma.default_link(), Link::Inverse);
        assert_eq!(
            Family::Tweedie { variance_power: 1.5_f64 }.default_link(),
            Link::Log
        );
    }

    #[test]
    fn response_domains() {
        assert!(Family::<f64>::Gamma.valid_response(0.1));
        assert!(!Family::<f64>::Gamma.valid_response(0.0));
        assert!(!Family::<f64>::Binomial.valid_response(1.5));
        assert!(!Family::<f64>::Poisson.valid_response(-1.0));
        assert!(!Family::<f64>::Gaussian.valid_response(f64::NAN));
    }

    #[test]
    fn binomial_deviance_at_endpoints_is_finite() {
        let f = Family::<f64>::Binomial;
        assert!(f.deviance(0.0, 0.2).is_finite());
        assert!(f.deviance(1.0, 0.8).is_finite());
        // perfect prediction contributes nothing
        assert_abs_diff_eq!(f.deviance(1.0, 1.0 - 1e-15), 0.0, epsilon = 1e-12);
    }
}
