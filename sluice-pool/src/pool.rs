//! Fixed-size worker pool draining a shared job queue.

use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use flume::{Receiver, Sender};
use tracing::{debug, error};

use crate::error::{PoolError, Result};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed-size pool of named worker threads.
///
/// Jobs are queued on an unbounded channel and picked up by whichever worker
/// is free. A panicking job is caught and logged so the worker keeps serving;
/// callers that need the panic payload must capture it inside the job.
///
/// Dropping the pool closes the queue and joins every worker.
///
/// # Examples
///
/// ```
/// use sluice_pool::WorkerPool;
///
/// let pool = WorkerPool::new(2)?;
/// let (tx, rx) = flume::bounded(1);
/// pool.execute(move || {
///     let _ = tx.send(21 * 2);
/// })?;
/// assert_eq!(rx.recv(), Ok(42));
/// # Ok::<(), sluice_pool::PoolError>(())
/// ```
pub struct WorkerPool {
    queue: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts a pool with the given number of workers.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroWorkers`] when `workers` is `0`, or
    /// [`PoolError::Spawn`] when a worker thread cannot be started.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(PoolError::ZeroWorkers);
        }
        let (queue, jobs) = flume::unbounded::<Job>();
        let workers = (0..workers)
            .map(|index| spawn_worker(index, jobs.clone()))
            .collect::<Result<Vec<_>>>()?;
        debug!(workers = workers.len(), "worker pool started");
        Ok(Self {
            queue: Some(queue),
            workers,
        })
    }

    /// Starts a pool sized to the host's available parallelism.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Spawn`] when a worker thread cannot be started.
    pub fn with_default_size() -> Result<Self> {
        Self::new(default_worker_count())
    }

    /// Number of worker threads in this pool.
    #[must_use]
    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queues a job for execution on the next free worker.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Shutdown`] when the pool is no longer accepting
    /// jobs.
    pub fn execute<J>(&self, job: J) -> Result<()>
    where
        J: FnOnce() + Send + 'static,
    {
        let queue = self.queue.as_ref().ok_or(PoolError::Shutdown)?;
        queue.send(Box::new(job)).map_err(|_| PoolError::Shutdown)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the queue lets every worker drain and exit its loop.
        drop(self.queue.take());
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

/// Worker count matching the host's available parallelism.
#[must_use]
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

fn spawn_worker(index: usize, jobs: Receiver<Job>) -> Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("sluice-worker-{index}"))
        .spawn(move || worker_loop(index, &jobs))
        .map_err(|e| PoolError::Spawn(e.to_string()))
}

fn worker_loop(index: usize, jobs: &Receiver<Job>) {
    while let Ok(job) = jobs.recv() {
        if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
            error!(worker = index, "job panicked");
        }
    }
    debug!(worker = index, "worker stopped");
}
