//! Caller-owned worker pool with bounded thread grants.
//!
//! A [`WorkerPool`] owns a fixed set of rayon worker threads and a count of
//! how many are not currently granted. An operation asks for up to `limit`
//! workers with [`WorkerPool::request`] and receives a [`ThreadGrant`] that
//! returns them when dropped, on every exit path.
//!
//! [`ThreadGrant::run`] executes one closure per granted worker plus one on
//! the calling thread and blocks until all of them finish. Results travel
//! back over a channel, so workers never write into shared buffers.

use std::sync::mpsc;

use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::PoolError;

/// A fixed-size pool of worker threads handed out in bounded grants.
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
    free: Mutex<usize>,
}

impl WorkerPool {
    /// Creates a pool of `workers` threads besides the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the threads cannot be spawned.
    pub fn new(workers: usize) -> Result<Self, PoolError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("zmpoly-worker-{i}"))
            .build()?;
        Ok(Self {
            pool,
            size: workers,
            free: Mutex::new(workers),
        })
    }

    /// Creates a pool sized to the machine, keeping one core for the caller.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] if the threads cannot be spawned.
    pub fn with_available_parallelism() -> Result<Self, PoolError> {
        let cores = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
        Self::new(cores.saturating_sub(1))
    }

    /// Returns the number of worker threads.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of workers not currently granted.
    #[must_use]
    pub fn available(&self) -> usize {
        *self.free.lock()
    }

    /// Grants up to `limit` idle workers.
    ///
    /// The grant may hold fewer workers than asked for, including none; the
    /// calling thread always takes part in [`ThreadGrant::run`].
    #[must_use]
    pub fn request(&self, limit: usize) -> ThreadGrant<'_> {
        let mut free = self.free.lock();
        let count = limit.min(*free);
        *free -= count;
        ThreadGrant { pool: self, count }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("available", &self.available())
            .finish()
    }
}

/// Workers borrowed from a [`WorkerPool`]; returned on drop.
#[derive(Debug)]
pub struct ThreadGrant<'p> {
    pool: &'p WorkerPool,
    count: usize,
}

impl ThreadGrant<'_> {
    /// Returns the number of granted workers, not counting the caller.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the number of threads [`run`](Self::run) uses.
    #[must_use]
    pub fn participants(&self) -> usize {
        self.count + 1
    }

    /// Runs `work(index)` on every participant and collects the results.
    ///
    /// Index 0 runs on the calling thread; indices `1..=count` run on the
    /// granted workers. The returned vector is ordered by index.
    pub fn run<T, F>(&self, work: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        if self.count == 0 {
            return vec![work(0)];
        }

        let (tx, rx) = mpsc::channel();
        let work = &work;
        self.pool.pool.in_place_scope(|scope| {
            for index in 1..=self.count {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    // the receiver outlives the scope
                    let _ = tx.send((index, work(index)));
                });
            }
            let _ = tx.send((0, work(0)));
        });
        drop(tx);

        let mut results: Vec<(usize, T)> = rx.into_iter().collect();
        results.sort_unstable_by_key(|&(index, _)| index);
        results.into_iter().map(|(_, value)| value).collect()
    }
}

impl Drop for ThreadGrant<'_> {
    fn drop(&mut self) {
        *self.pool.free.lock() += self.count;
    }
}
