//! Service-level fan-out across independent worker runs.
//!
//! A single worker instance is single-threaded and non-suspending: all of its state is owned
//! exclusively, nothing yields, and the only shared object is the immutable
//! [`crate::data::TransitDataProvider`] view. Running several independent queries in parallel is
//! therefore a concern of the caller, not of the worker itself. This is the one place in the crate
//! that performs explicit multi-threading, using an owned, explicitly-sized [`rayon::ThreadPool`]
//! rather than the global pool, since `Tuning::search_thread_pool_size` is itself part of this
//! crate's validated configuration surface.

use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Runs independent worker calls across a dedicated thread pool sized from
/// [`crate::worker::Tuning::search_thread_pool_size`]. A size of `0` runs every call on the
/// caller's thread, matching the documented default and letting single-query callers skip the
/// pool entirely.
pub struct Dispatcher {
    pool: Option<ThreadPool>,
}

impl Dispatcher {
    /// Builds a dispatcher for `search_thread_pool_size` worker threads; `0` means "run in the
    /// caller" and never builds a pool.
    pub fn new(search_thread_pool_size: usize) -> Self {
        let pool = (search_thread_pool_size > 0).then(|| {
            ThreadPoolBuilder::new()
                .num_threads(search_thread_pool_size)
                .build()
                .expect("failed to build search thread pool")
        });
        Self { pool }
    }

    /// Runs `f` once per item of `items`, preserving input order in the returned `Vec`. Without a
    /// pool, every call runs sequentially on the caller's thread.
    pub fn run<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(|item| f(item)).collect()),
            None => items.iter().map(|item| f(item)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_caller_dispatcher_preserves_order() {
        let dispatcher = Dispatcher::new(0);
        let items = vec![1, 2, 3, 4, 5];
        let results = dispatcher.run(&items, |n| n * n);
        assert_eq!(results, vec![1, 4, 9, 16, 25]);
    }

    #[test]
    fn pooled_dispatcher_preserves_order() {
        let dispatcher = Dispatcher::new(2);
        let items: Vec<i32> = (0..50).collect();
        let results = dispatcher.run(&items, |n| n * 2);
        let expected: Vec<i32> = (0..50).map(|n| n * 2).collect();
        assert_eq!(results, expected);
    }
}
