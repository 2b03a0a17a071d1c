//! Error types for pipeline evaluation.

use sluice_pool::PoolError;
use thiserror::Error;

/// Errors surfaced by terminal pipeline operations.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// A terminal operation was invoked on a pipeline that has already been
    /// driven (or whose evaluation was aborted mid-flight).
    #[error("pipeline has already been consumed by a terminal operation")]
    AlreadyConsumed,

    /// The worker pool refused or lost a chunk job.
    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
