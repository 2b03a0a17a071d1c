//! Sluice Core
//!
//! A lazy sequence-pipeline engine: wrap a source of elements, chain
//! transformation stages onto it, and drive the whole chain exactly once
//! with a terminal operation. Nothing is pulled from the source until a
//! terminal operation runs, and a pipeline that has been evaluated refuses
//! to run again.
//!
//! ```
//! use sluice_core::Pipeline;
//!
//! let mut pipeline = Pipeline::from_collection(vec![1, 2, 2, 3])
//!     .distinct()
//!     .map(|n| n * 10);
//!
//! assert_eq!(pipeline.to_vec()?, vec![10, 20, 30]);
//! # Ok::<(), sluice_core::PipelineError>(())
//! ```
//!
//! Parallel evaluation partitions the source into chunks and runs the
//! element-local part of the chain on a [`sluice_pool::WorkerPool`]; see
//! [`Pipeline::parallel`] and [`Pipeline::parallel_with`].

pub mod engine;
pub mod error;
pub mod pipeline;

// Re-export main types for easier access
pub use engine::Pipeline;
pub use error::PipelineError;
pub use pipeline::source::{PipelineBuilder, Source};
pub use pipeline::stage::{Stage, StageKind};
pub use pipeline::types::{Comparator, ElementIter, ExecutionMode, Predicate, Transform};
