//! Sluice Pool
//!
//! This crate provides the fixed-size worker pool used by the Sluice pipeline
//! engine for parallel evaluation. The pool is an explicit, constructible
//! value: callers create one, share it behind an `Arc` if they want it
//! process-wide, and drop it to join every worker deterministically. Nothing
//! in this crate is global state.

#![warn(missing_docs)]

pub mod error;
pub mod pool;

// Re-export main types for easier access
pub use error::{PoolError, Result};
pub use pool::{default_worker_count, WorkerPool};
