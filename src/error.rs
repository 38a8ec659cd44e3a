//! define the error enum for the result of fits

use thiserror::Error;

pub type GlmResult<T> = Result<T, GlmError>;

/// Fatal fit failures. Each variant corresponds to one leg of the error
/// taxonomy so callers can distinguish a bad request from a bad matrix from a
/// bad cluster. Non-convergence within the iteration budget is not an error;
/// it is flagged on the fitted model instead.
#[derive(Error, Debug)]
pub enum GlmError {
    /// Rejected before the first accumulation pass: schema mismatch, invalid
    /// family/link/penalty settings, or response values outside the family
    /// domain.
    #[error("configuration: {0}")]
    Config(String),
    /// The inner solve or the accumulation produced something no fallback can
    /// recover from.
    #[error("numerical instability: {0}")]
    Numerical(String),
    /// Propagated from the partition-execution backend.
    #[error("partition execution: {0}")]
    Execution(String),
}
