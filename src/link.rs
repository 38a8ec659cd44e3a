//! link functions mapping between the linear predictor and the mean scale

use crate::num::Float;
use std::fmt;

/// The invertible map between the linear predictor η and the response mean μ,
/// plus the derivative needed for the IRLS weights. Domain violations are
/// clamped rather than propagated as NaN; the guard width `eps` comes from
/// the fit controls so it stays tunable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Identity,
    Log,
    Logit,
    Inverse,
}

impl Link {
    /// Inverse link: the response mean for a given linear predictor.
    ///
    /// Log means are clamped into [eps, 1/eps] so a wandering linear
    /// predictor can never produce a non-positive or infinite mean; logit
    /// means are clamped into (eps, 1-eps); the inverse link keeps the
    /// predictor away from zero.
    pub fn mean<F: Float>(self, eta: F, eps: F) -> F {
        match self {
            Link::Identity => eta,
            Link::Log => {
                let mu = num_traits::Float::exp(eta);
                mu.max(eps).min(num_traits::Float::recip(eps))
            }
            Link::Logit => {
                let mu = num_traits::Float::recip(F::one() + num_traits::Float::exp(-eta));
                mu.max(eps).min(F::one() - eps)
            }
            Link::Inverse => {
                // a zero predictor would send the mean to infinity
                let denom = if num_traits::Float::abs(eta) < eps {
                    if eta < F::zero() {
                        -eps
                    } else {
                        eps
                    }
                } else {
                    eta
                };
                num_traits::Float::recip(denom)
            }
        }
    }

    /// The link function proper, mapping a mean in the family domain to the
    /// linear predictor.
    pub fn func<F: Float>(self, mu: F) -> F {
        match self {
            Link::Identity => mu,
            Link::Log => num_traits::Float::ln(mu),
            Link::Logit => num_traits::Float::ln(mu / (F::one() - mu)),
            Link::Inverse => num_traits::Float::recip(mu),
        }
    }

    /// dη/dμ at the given mean. The mean must already have been clamped into
    /// the family domain; `Family::clamp_mean` guarantees that in the
    /// accumulator.
    pub fn deriv<F: Float>(self, mu: F) -> F {
        match self {
            Link::Identity => F::one(),
            Link::Log => num_traits::Float::recip(mu),
            Link::Logit => num_traits::Float::recip(mu * (F::one() - mu)),
            Link::Inverse => -num_traits::Float::recip(mu * mu),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Link::Identity => "identity",
            Link::Log => "log",
            Link::Logit => "logit",
            Link::Inverse => "inverse",
        };
        write!(f, "{}", name)
    }
}
