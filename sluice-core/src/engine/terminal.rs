//! Terminal operations: the single driver of a pipeline's evaluation.
//!
//! Every operation here consumes the pipeline's chain exactly once. In
//! sequential mode the elements are pulled one by one through the stage
//! chain; in parallel mode the chunked executor produces per-chunk partial
//! results that are merged with the operation's associative combiner.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::error::Result;
use crate::pipeline::types::{ElementIter, ExecutionMode};

use super::Pipeline;

impl<T> Pipeline<T>
where
    T: Send + 'static,
{
    /// Number of elements surviving the chain.
    pub fn count(&mut self) -> Result<usize> {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(|elements| elements.count()),
            ExecutionMode::Parallel => {
                self.run_parallel(|elements: ElementIter<T>| elements.count(), |a, b| a + b)
            }
        }
    }

    /// Applies `action` to every surviving element.
    ///
    /// Sequential pipelines consume in encounter order. Parallel pipelines
    /// run the chain on the workers and apply `action` on the calling thread
    /// once the chunks complete, so ordering across chunks is unspecified.
    pub fn for_each<F>(&mut self, action: F) -> Result<()>
    where
        F: FnMut(T),
    {
        match self.mode {
            ExecutionMode::Sequential => {
                self.run_sequential(move |elements| elements.for_each(action))
            }
            ExecutionMode::Parallel => {
                let items = self.materialize_parallel()?;
                items.into_iter().for_each(action);
                Ok(())
            }
        }
    }

    /// Whether any surviving element matches the predicate.
    ///
    /// Short-circuits on the first match within the sequential pull, and
    /// within each parallel chunk.
    pub fn any_match<P>(&mut self, predicate: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match self.mode {
            ExecutionMode::Sequential => {
                self.run_sequential(move |mut elements| elements.any(|element| predicate(&element)))
            }
            ExecutionMode::Parallel => self.run_parallel(
                move |mut elements: ElementIter<T>| elements.any(|element| predicate(&element)),
                |a, b| a || b,
            ),
        }
    }

    /// Whether every surviving element matches the predicate.
    pub fn all_match<P>(&mut self, predicate: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match self.mode {
            ExecutionMode::Sequential => {
                self.run_sequential(move |mut elements| elements.all(|element| predicate(&element)))
            }
            ExecutionMode::Parallel => self.run_parallel(
                move |mut elements: ElementIter<T>| elements.all(|element| predicate(&element)),
                |a, b| a && b,
            ),
        }
    }

    /// Whether no surviving element matches the predicate.
    pub fn none_match<P>(&mut self, predicate: P) -> Result<bool>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        match self.mode {
            ExecutionMode::Sequential => {
                self.run_sequential(move |mut elements| !elements.any(|element| predicate(&element)))
            }
            ExecutionMode::Parallel => self.run_parallel(
                move |mut elements: ElementIter<T>| !elements.any(|element| predicate(&element)),
                |a, b| a && b,
            ),
        }
    }

    /// First surviving element in encounter order, or `None`.
    pub fn find_first(&mut self) -> Result<Option<T>> {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(|mut elements| elements.next()),
            ExecutionMode::Parallel => {
                self.run_parallel(|mut elements: ElementIter<T>| elements.next(), Option::or)
            }
        }
    }

    /// Any surviving element, or `None`.
    ///
    /// Sequentially this behaves like [`Pipeline::find_first`]; in parallel
    /// mode the element may come from any chunk.
    pub fn find_any(&mut self) -> Result<Option<T>> {
        self.find_first()
    }

    /// Folds the surviving elements onto `identity` with `op`.
    ///
    /// Sequential pipelines fold left in encounter order. Parallel pipelines
    /// fold each chunk from a clone of `identity` and merge the partial
    /// results with `op`, so `identity` must be a true identity for `op` and
    /// `op` must be associative for the parallel result to be defined.
    pub fn reduce<F>(&mut self, identity: T, op: F) -> Result<T>
    where
        T: Clone + Sync,
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(move |elements| {
                elements.fold(identity, |acc, element| op(acc, element))
            }),
            ExecutionMode::Parallel => {
                let op = Arc::new(op);
                let chunk_op = Arc::clone(&op);
                self.run_parallel(
                    move |elements: ElementIter<T>| {
                        elements.fold(identity.clone(), |acc, element| chunk_op(acc, element))
                    },
                    move |left, right| op(left, right),
                )
            }
        }
    }

    /// Materializes the surviving elements into any extendable container.
    pub fn collect_into<C>(&mut self, mut container: C) -> Result<C>
    where
        C: Extend<T>,
    {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(move |elements| {
                container.extend(elements);
                container
            }),
            ExecutionMode::Parallel => {
                let items = self.materialize_parallel()?;
                container.extend(items);
                Ok(container)
            }
        }
    }

    /// Surviving elements as a vector, in encounter order.
    pub fn to_vec(&mut self) -> Result<Vec<T>> {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(|elements| elements.collect()),
            ExecutionMode::Parallel => self.materialize_parallel(),
        }
    }

    /// Surviving elements as a boxed slice.
    pub fn to_array(&mut self) -> Result<Box<[T]>> {
        self.to_vec().map(Vec::into_boxed_slice)
    }

    /// Minimal element under natural ordering, or `None` when empty.
    pub fn min(&mut self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.min_by(T::cmp)
    }

    /// Maximal element under natural ordering, or `None` when empty.
    pub fn max(&mut self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.max_by(T::cmp)
    }

    /// Minimal element under `comparator`; the earliest one wins ties.
    pub fn min_by<F>(&mut self, comparator: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        match self.mode {
            ExecutionMode::Sequential => {
                self.run_sequential(move |elements| elements.min_by(|a, b| comparator(a, b)))
            }
            ExecutionMode::Parallel => {
                let comparator = Arc::new(comparator);
                let chunk_comparator = Arc::clone(&comparator);
                self.run_parallel(
                    move |elements: ElementIter<T>| elements.min_by(|a, b| chunk_comparator(a, b)),
                    move |left, right| match (left, right) {
                        (Some(a), Some(b)) => {
                            if comparator(&a, &b) == Ordering::Greater {
                                Some(b)
                            } else {
                                Some(a)
                            }
                        }
                        (a, None) => a,
                        (None, b) => b,
                    },
                )
            }
        }
    }

    /// Maximal element under `comparator`; the latest one wins ties.
    pub fn max_by<F>(&mut self, comparator: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        match self.mode {
            ExecutionMode::Sequential => {
                self.run_sequential(move |elements| elements.max_by(|a, b| comparator(a, b)))
            }
            ExecutionMode::Parallel => {
                let comparator = Arc::new(comparator);
                let chunk_comparator = Arc::clone(&comparator);
                self.run_parallel(
                    move |elements: ElementIter<T>| elements.max_by(|a, b| chunk_comparator(a, b)),
                    move |left, right| match (left, right) {
                        (Some(a), Some(b)) => {
                            if comparator(&a, &b) == Ordering::Greater {
                                Some(a)
                            } else {
                                Some(b)
                            }
                        }
                        (a, None) => a,
                        (None, b) => b,
                    },
                )
            }
        }
    }

    fn materialize_parallel(&mut self) -> Result<Vec<T>> {
        self.run_parallel(
            |elements: ElementIter<T>| elements.collect::<Vec<T>>(),
            |mut left, mut right| {
                left.append(&mut right);
                left
            },
        )
    }
}

impl Pipeline<i64> {
    /// Sum of the surviving elements.
    pub fn sum(&mut self) -> Result<i64> {
        match self.mode {
            ExecutionMode::Sequential => self.run_sequential(|elements| elements.sum()),
            ExecutionMode::Parallel => self.run_parallel(
                |elements: ElementIter<i64>| elements.sum::<i64>(),
                |a, b| a + b,
            ),
        }
    }
}
