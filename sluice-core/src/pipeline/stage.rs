//! Stages are the lazy transformation steps of a pipeline chain.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::pipeline::types::{
    Comparator, ElementIter, Predicate, SeenFilter, SeenFilterFactory, Transform,
};

/// One lazy transformation step, tagged by operation kind.
///
/// Every variant wraps the upstream cursor without pulling from it, except
/// where the operation's semantics require buffering: `Sorted` drains the
/// whole upstream on its first pull, and `Distinct` grows a seen-set with
/// unique-element cardinality. `Distinct` carries a factory so that every
/// evaluation gets an independent seen-set.
pub enum Stage<T> {
    /// Pass through elements matching the predicate; order-preserving.
    Filter(Predicate<T>),
    /// One-to-one transform; order-preserving.
    Map(Transform<T>),
    /// Emit only the first occurrence of each element, by equality.
    Distinct(SeenFilterFactory<T>),
    /// Emit all elements in ascending comparator order.
    Sorted(Comparator<T>),
    /// Drop the first `n` elements.
    Skip(usize),
    /// Keep only the first `n` elements.
    Limit(usize),
}

impl<T: Send + 'static> Stage<T> {
    /// Wraps the upstream cursor into this stage's lazy view of it.
    pub(crate) fn apply(&self, input: ElementIter<T>) -> ElementIter<T> {
        match self {
            Self::Filter(predicate) => {
                let predicate = Arc::clone(predicate);
                Box::new(input.filter(move |element| predicate(element)))
            }
            Self::Map(transform) => {
                let transform = Arc::clone(transform);
                Box::new(input.map(move |element| transform(element)))
            }
            Self::Distinct(factory) => {
                let mut is_first = factory();
                Box::new(input.filter(move |element| is_first(element)))
            }
            Self::Sorted(comparator) => {
                let comparator = Arc::clone(comparator);
                let mut upstream = Some(input);
                let mut buffered = Vec::new().into_iter();
                Box::new(std::iter::from_fn(move || {
                    // The whole upstream is drained on the first pull.
                    if let Some(elements) = upstream.take() {
                        let mut all: Vec<T> = elements.collect();
                        all.sort_by(|a, b| comparator(a, b));
                        buffered = all.into_iter();
                    }
                    buffered.next()
                }))
            }
            Self::Skip(n) => Box::new(input.skip(*n)),
            Self::Limit(n) => Box::new(input.take(*n)),
        }
    }

    pub(crate) fn distinct() -> Self
    where
        T: Eq + Hash + Clone,
    {
        Self::Distinct(Arc::new(|| {
            let mut seen = HashSet::new();
            Box::new(move |element: &T| seen.insert(element.clone())) as SeenFilter<T>
        }))
    }
}

impl<T> Stage<T> {
    /// The operation kind, for diagnostics.
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Filter(_) => StageKind::Filter,
            Self::Map(_) => StageKind::Map,
            Self::Distinct(_) => StageKind::Distinct,
            Self::Sorted(_) => StageKind::Sorted,
            Self::Skip(_) => StageKind::Skip,
            Self::Limit(_) => StageKind::Limit,
        }
    }
}

impl<T> fmt::Debug for Stage<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind())
    }
}

/// Operation kind of a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Predicate pass-through.
    Filter,
    /// One-to-one transform.
    Map,
    /// First occurrence only.
    Distinct,
    /// Buffered comparator sort.
    Sorted,
    /// Drop a prefix.
    Skip,
    /// Keep a prefix.
    Limit,
}

impl StageKind {
    /// Whether the stage looks at one element at a time, independent of the
    /// rest of the sequence, and can therefore run chunk-local in parallel
    /// mode.
    #[must_use]
    pub fn is_element_local(self) -> bool {
        matches!(self, Self::Filter | Self::Map)
    }
}
