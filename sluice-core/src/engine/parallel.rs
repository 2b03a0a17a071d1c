//! Chunked evaluation of a pipeline on a worker pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sluice_pool::{PoolError, WorkerPool};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::pipeline::stage::Stage;
use crate::pipeline::types::ElementIter;

use super::Pipeline;

impl<T> Pipeline<T>
where
    T: Send + 'static,
{
    /// Drives the pipeline by chunking the source across the worker pool.
    ///
    /// `evaluate` produces one partial result per chunk and `combine` merges
    /// the partials in chunk (encounter) order. Partials are merged only
    /// after every chunk has completed.
    pub(super) fn run_parallel<R, E, C>(&mut self, evaluate: E, mut combine: C) -> Result<R>
    where
        R: Send + 'static,
        E: Fn(ElementIter<T>) -> R + Send + Sync + 'static,
        C: FnMut(R, R) -> R,
    {
        let (source, mut stages) = self.begin()?;
        let evaluate: Arc<dyn Fn(ElementIter<T>) -> R + Send + Sync> = Arc::new(evaluate);

        // Everything up to the first stage that couples elements across
        // chunk boundaries runs chunk-local; the rest runs on the merge.
        let boundary = stages
            .iter()
            .position(|stage| !stage.kind().is_element_local())
            .unwrap_or(stages.len());
        let merged_stages = stages.split_off(boundary);
        let chunk_stages = Arc::new(stages);

        let injected = self.pool.clone();
        let scoped;
        let pool = match injected.as_deref() {
            Some(pool) => pool,
            None => {
                scoped = WorkerPool::with_default_size()?;
                &scoped
            }
        };

        let items: Vec<T> = source.into_elements().collect();
        let chunks = chunkify(items, pool.size());
        debug!(
            chunks = chunks.len(),
            chunk_stages = chunk_stages.len(),
            merged_stages = merged_stages.len(),
            "evaluating pipeline in parallel"
        );

        let result = if merged_stages.is_empty() {
            let partials = run_chunks(pool, chunks, chunk_stages, Arc::clone(&evaluate))?;
            let mut combined: Option<R> = None;
            for partial in partials {
                combined = Some(match combined {
                    Some(acc) => combine(acc, partial),
                    None => partial,
                });
            }
            match combined {
                Some(result) => result,
                None => evaluate(Box::new(std::iter::empty())),
            }
        } else {
            let collect: Arc<dyn Fn(ElementIter<T>) -> Vec<T> + Send + Sync> =
                Arc::new(|elements| elements.collect());
            let collected = run_chunks(pool, chunks, chunk_stages, collect)?;
            let merged: Vec<T> = collected.into_iter().flatten().collect();
            let mut elements: ElementIter<T> = Box::new(merged.into_iter());
            for stage in &merged_stages {
                elements = stage.apply(elements);
            }
            evaluate(elements)
        };

        self.finish();
        Ok(result)
    }
}

enum ChunkOutcome<R> {
    Done(R),
    Panicked(Box<dyn Any + Send>),
    Skipped,
}

/// Runs the chunk-local stages plus `evaluate` over every chunk, returning
/// the per-chunk results in chunk order.
///
/// The first panicking chunk marks the evaluation cancelled, chunks still
/// queued behind it are skipped, and the payload is re-raised unchanged on
/// the calling thread.
fn run_chunks<T, R>(
    pool: &WorkerPool,
    chunks: Vec<Vec<T>>,
    stages: Arc<Vec<Stage<T>>>,
    evaluate: Arc<dyn Fn(ElementIter<T>) -> R + Send + Sync>,
) -> Result<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
{
    let expected = chunks.len();
    let (results_tx, results_rx) = flume::bounded(expected);
    let cancelled = Arc::new(AtomicBool::new(false));

    for (index, chunk) in chunks.into_iter().enumerate() {
        let results = results_tx.clone();
        let stages = Arc::clone(&stages);
        let evaluate = Arc::clone(&evaluate);
        let cancelled = Arc::clone(&cancelled);
        pool.execute(move || {
            if cancelled.load(Ordering::Acquire) {
                let _ = results.send((index, ChunkOutcome::Skipped));
                return;
            }
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let mut elements: ElementIter<T> = Box::new(chunk.into_iter());
                for stage in stages.iter() {
                    elements = stage.apply(elements);
                }
                evaluate(elements)
            }));
            let outcome = match outcome {
                Ok(result) => ChunkOutcome::Done(result),
                Err(payload) => {
                    cancelled.store(true, Ordering::Release);
                    ChunkOutcome::Panicked(payload)
                }
            };
            let _ = results.send((index, outcome));
        })?;
    }
    drop(results_tx);

    let mut slots: Vec<Option<R>> = Vec::with_capacity(expected);
    slots.resize_with(expected, || None);
    let mut first_panic: Option<Box<dyn Any + Send>> = None;
    for _ in 0..expected {
        let (index, outcome) = results_rx
            .recv()
            .map_err(|_| PipelineError::Pool(PoolError::Shutdown))?;
        match outcome {
            ChunkOutcome::Done(result) => slots[index] = Some(result),
            ChunkOutcome::Panicked(payload) => {
                if first_panic.is_none() {
                    first_panic = Some(payload);
                }
            }
            ChunkOutcome::Skipped => {}
        }
    }
    if let Some(payload) = first_panic {
        panic::resume_unwind(payload);
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Contiguous, near-equal chunks; always at least one (possibly empty).
fn chunkify<T>(mut items: Vec<T>, max_chunks: usize) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    let count = max_chunks.clamp(1, items.len());
    let base = items.len() / count;
    let extra = items.len() % count;
    let mut chunks = Vec::with_capacity(count);
    for index in 0..count {
        let len = base + usize::from(index < extra);
        let rest = items.split_off(len);
        chunks.push(items);
        items = rest;
    }
    chunks
}
