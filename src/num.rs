//! numerical trait constraints
use ndarray::ScalarOperand;
use ndarray_linalg::Lapack;

/// Element type shared by the accumulator, the LAPACK-backed inner solves and
/// the parallel partition backend (hence `Send + Sync`).
pub trait Float: Sized + num_traits::Float + Lapack + ScalarOperand + Send + Sync {}

impl Float for f32 {}
impl Float for f64 {}
