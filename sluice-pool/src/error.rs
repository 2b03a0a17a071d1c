//! Error types for worker pool operations

use thiserror::Error;

/// Errors that can occur when working with a worker pool
#[derive(Error, Debug, Clone)]
pub enum PoolError {
    /// The pool was configured with zero workers
    #[error("worker pool requires at least one worker")]
    ZeroWorkers,

    /// A worker thread could not be spawned
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),

    /// A job was submitted after the pool shut down
    #[error("worker pool is shut down")]
    Shutdown,
}

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;
