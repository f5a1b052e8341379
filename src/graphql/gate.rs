//! Bounded-concurrency gate for outbound requests.

use rayon::{ThreadPool, ThreadPoolBuilder};

/// Fixed-size worker pool every outbound request runs on. The pool size is
/// the process-wide cap on in-flight requests; callers block until a worker
/// frees up.
pub(crate) struct RequestGate {
    pool: ThreadPool,
}

impl RequestGate {
    pub(crate) fn new(max_inflight: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(max_inflight.max(1))
            .thread_name(|i| format!("graphql-{i}"))
            .build()?;
        Ok(RequestGate { pool })
    }

    pub(crate) fn run<T, F>(&self, task: F) -> T
    where
        T: Send,
        F: FnOnce() -> T + Send,
    {
        self.pool.install(task)
    }
}
