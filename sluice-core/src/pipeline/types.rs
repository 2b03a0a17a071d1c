use std::cmp::Ordering;
use std::sync::Arc;

/// Boxed lazy cursor of elements flowing between stages.
pub type ElementIter<T> = Box<dyn Iterator<Item = T> + Send>;

/// Shared predicate over borrowed elements.
pub type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Shared one-to-one element transform.
pub type Transform<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Shared comparator used by `sorted` stages and extremal terminals.
pub type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Stateful first-occurrence filter; one instance per evaluation.
pub type SeenFilter<T> = Box<dyn FnMut(&T) -> bool + Send>;

/// Factory producing a fresh [`SeenFilter`] for each evaluation.
pub type SeenFilterFactory<T> = Arc<dyn Fn() -> SeenFilter<T> + Send + Sync>;

/// Execution mode a pipeline is driven in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Single-threaded pull through the whole chain.
    Sequential,
    /// Chunked evaluation on a worker pool.
    Parallel,
}

/// Lifecycle of a pipeline.
///
/// A pipeline is `Built` while stages are appended, `Evaluating` while a
/// terminal operation drives it, and `Consumed` afterwards. Only a `Built`
/// pipeline may start evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PipelineState {
    Built,
    Evaluating,
    Consumed,
}
