//! The pipeline runner: builder surface, state machine, and evaluation.

mod parallel;
mod terminal;

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::mem;
use std::sync::Arc;

use sluice_pool::WorkerPool;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::source::{PipelineBuilder, Source};
use crate::pipeline::stage::Stage;
use crate::pipeline::types::{ElementIter, ExecutionMode, PipelineState};

/// A lazily evaluated sequence pipeline.
///
/// A pipeline wraps a [`Source`] and an ordered chain of [`Stage`]s. Building
/// the chain performs no work; a terminal operation (see [`Pipeline::count`],
/// [`Pipeline::to_vec`] and friends) pulls every element through the chain
/// exactly once and leaves the pipeline consumed. Driving a consumed pipeline
/// again fails with [`PipelineError::AlreadyConsumed`].
///
/// # Type Parameters
///
/// * `T` - The element type flowing through the chain. Stages preserve it;
///   [`Pipeline::flat_map`] is the one operation that may re-type a pipeline.
///
/// # Examples
///
/// ```
/// use sluice_core::Pipeline;
///
/// let mut pipeline = Pipeline::from_collection(vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10])
///     .skip(3)
///     .limit(5);
///
/// assert_eq!(pipeline.to_vec()?, vec![4, 5, 6, 7, 8]);
/// # Ok::<(), sluice_core::PipelineError>(())
/// ```
pub struct Pipeline<T> {
    source: Option<Source<T>>,
    stages: Vec<Stage<T>>,
    mode: ExecutionMode,
    pool: Option<Arc<WorkerPool>>,
    state: PipelineState,
}

impl<T> Pipeline<T>
where
    T: Send + 'static,
{
    fn with_source(source: Source<T>) -> Self {
        Self {
            source: Some(source),
            stages: Vec::new(),
            mode: ExecutionMode::Sequential,
            pool: None,
            state: PipelineState::Built,
        }
    }

    /// Creates a pipeline over an owned collection.
    #[must_use]
    pub fn from_collection(items: Vec<T>) -> Self {
        Self::with_source(Source::from_collection(items))
    }

    /// Creates a pipeline over a copy of a slice.
    #[must_use]
    pub fn from_slice(items: &[T]) -> Self
    where
        T: Clone,
    {
        Self::with_source(Source::from_slice(items))
    }

    /// Creates a pipeline over an arbitrary iterator, bounded or not.
    ///
    /// Unbounded iterators are usable together with [`Pipeline::limit`] or a
    /// short-circuiting terminal operation.
    #[must_use]
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
    {
        Self::with_source(Source::from_iterator(iter))
    }

    /// Starts an explicit element-by-element [`PipelineBuilder`].
    #[must_use]
    pub fn builder() -> PipelineBuilder<T> {
        PipelineBuilder::new()
    }

    /// Keeps only the elements matching `predicate`.
    #[must_use]
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push(Stage::Filter(Arc::new(predicate)))
    }

    /// Transforms every element, preserving the element type.
    ///
    /// Use [`Pipeline::flat_map`] when the transform changes the element
    /// type or produces more than one output per element.
    #[must_use]
    pub fn map<F>(self, transform: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.push(Stage::Map(Arc::new(transform)))
    }

    /// Replaces each element with a sub-sequence and concatenates the
    /// sub-sequences in encounter order.
    ///
    /// Because the element type may change, the chain built so far is folded
    /// into the source of the returned pipeline; stages appended afterwards
    /// see the flattened elements. Evaluation stays lazy throughout.
    #[must_use]
    pub fn flat_map<U, I, F>(mut self, transform: F) -> Pipeline<U>
    where
        U: Send + 'static,
        F: Fn(T) -> I + Send + Sync + 'static,
        I: IntoIterator<Item = U>,
        I::IntoIter: Send + 'static,
    {
        assert!(
            self.state == PipelineState::Built,
            "cannot append a stage to a pipeline that has already been evaluated"
        );
        let source = self
            .source
            .take()
            .expect("a built pipeline always has a source");
        let stages = mem::take(&mut self.stages);
        let mut elements = source.into_elements();
        for stage in &stages {
            elements = stage.apply(elements);
        }
        let flattened = elements.flat_map(move |element| transform(element).into_iter());
        Pipeline {
            source: Some(Source::from_iterator(flattened)),
            stages: Vec::new(),
            mode: self.mode,
            pool: self.pool.clone(),
            state: PipelineState::Built,
        }
    }

    /// Keeps only the first occurrence of each element, by equality.
    #[must_use]
    pub fn distinct(self) -> Self
    where
        T: Eq + Hash + Clone,
    {
        self.push(Stage::distinct())
    }

    /// Emits all elements in natural ascending order.
    #[must_use]
    pub fn sorted(self) -> Self
    where
        T: Ord,
    {
        self.push(Stage::Sorted(Arc::new(T::cmp)))
    }

    /// Emits all elements in ascending order under `comparator`.
    #[must_use]
    pub fn sorted_by<F>(self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.push(Stage::Sorted(Arc::new(comparator)))
    }

    /// Drops the first `n` elements.
    #[must_use]
    pub fn skip(self, n: usize) -> Self {
        self.push(Stage::Skip(n))
    }

    /// Keeps only the first `n` elements.
    #[must_use]
    pub fn limit(self, n: usize) -> Self {
        self.push(Stage::Limit(n))
    }

    /// Switches to parallel evaluation on a pool scoped to the next terminal
    /// operation.
    ///
    /// The scoped pool is sized to the host's available parallelism and is
    /// released as soon as the terminal operation returns. Use
    /// [`Pipeline::parallel_with`] to share a long-lived pool instead.
    #[must_use]
    pub fn parallel(mut self) -> Self {
        self.mode = ExecutionMode::Parallel;
        self
    }

    /// Switches to parallel evaluation on an injected pool.
    ///
    /// ```
    /// use std::sync::Arc;
    /// use sluice_core::Pipeline;
    /// use sluice_pool::WorkerPool;
    ///
    /// let pool = Arc::new(WorkerPool::new(2)?);
    /// let mut pipeline = Pipeline::from_range(0, 100).parallel_with(pool);
    /// assert_eq!(pipeline.sum()?, 4950);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn parallel_with(mut self, pool: Arc<WorkerPool>) -> Self {
        self.mode = ExecutionMode::Parallel;
        self.pool = Some(pool);
        self
    }

    /// Switches back to single-threaded evaluation.
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.mode = ExecutionMode::Sequential;
        self
    }

    /// Whether terminal operations will evaluate in parallel mode.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.mode == ExecutionMode::Parallel
    }

    /// The mode the next terminal operation will evaluate in.
    #[must_use]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn push(mut self, stage: Stage<T>) -> Self {
        assert!(
            self.state == PipelineState::Built,
            "cannot append a stage to a pipeline that has already been evaluated"
        );
        self.stages.push(stage);
        self
    }

    fn begin(&mut self) -> Result<(Source<T>, Vec<Stage<T>>)> {
        if self.state != PipelineState::Built {
            return Err(PipelineError::AlreadyConsumed);
        }
        let source = self.source.take().ok_or(PipelineError::AlreadyConsumed)?;
        self.state = PipelineState::Evaluating;
        Ok((source, mem::take(&mut self.stages)))
    }

    fn finish(&mut self) {
        self.state = PipelineState::Consumed;
    }

    fn run_sequential<R>(&mut self, evaluate: impl FnOnce(ElementIter<T>) -> R) -> Result<R> {
        let (source, stages) = self.begin()?;
        debug!(stages = stages.len(), "evaluating pipeline sequentially");
        let mut elements = source.into_elements();
        for stage in &stages {
            elements = stage.apply(elements);
        }
        let result = evaluate(elements);
        self.finish();
        Ok(result)
    }
}

impl Pipeline<i64> {
    /// Creates a pipeline over the half-open range `[start, end)`.
    ///
    /// An inverted range (`end <= start`) yields no elements.
    #[must_use]
    pub fn from_range(start: i64, end: i64) -> Self {
        Self::with_source(Source::from_range(start, end))
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("mode", &self.mode)
            .field("state", &self.state)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}
