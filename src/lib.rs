//! Generalized linear models fit by iteratively reweighted least squares over
//! partitioned columnar data.
//!
//! The engine consumes a [`Frame`] of typed columns (categoricals are one-hot
//! expanded against a dropped reference level), accumulates the weighted
//! normal equations partition by partition through a [`Backend`], solves the
//! inner weighted least squares by Cholesky factorization (or coordinate
//! descent when an L1 penalty is present), and iterates to convergence.
//! Fitted models carry their diagnostics (null/residual deviance, AIC) and
//! are addressable through a keyed [`Store`].
//!
//! ```no_run
//! use frame_glm::{fit_glm, Column, Family, Frame, GlmRequest, Key};
//! use ndarray::array;
//!
//! # fn main() -> frame_glm::GlmResult<()> {
//! let frame = Frame::new(
//!     vec![Column::numeric("x", array![0., 1., 2., 3.])],
//!     array![1., 2., 4., 8.],
//! )?;
//! let request = GlmRequest::new(Key::make("dest"), Key::make("src"), Family::Poisson);
//! let model = fit_glm(&frame, &request)?.pop().unwrap();
//! println!("slope: {:?}", model.coefficient("x"));
//! println!("aic: {:?}", model.validation().aic);
//! # Ok(())
//! # }
//! ```

pub mod design;
pub mod error;
pub mod exec;
pub mod family;
pub mod frame;
pub mod gram;
pub mod irls;
pub mod link;
mod math;
pub mod model;
pub mod num;
mod path;
pub mod reg;
mod solve;
pub mod store;
pub mod validation;

pub use crate::design::Design;
pub use crate::error::{GlmError, GlmResult};
pub use crate::exec::Backend;
pub use crate::family::Family;
pub use crate::frame::{Column, Frame, FramePartition};
pub use crate::gram::{AccumTask, GramStats};
pub use crate::irls::IrlsControl;
pub use crate::link::Link;
pub use crate::model::{fit_glm, run_glm, GlmModel, GlmRequest};
pub use crate::reg::Penalty;
pub use crate::store::{Key, Store};
pub use crate::validation::GlmValidation;

pub use ndarray::{Array1, Array2};
