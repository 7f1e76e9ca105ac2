use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Only {finished} of {total} workers finished within {timeout:?}.")]
    ShutdownTimeout {
        finished: usize,
        total: usize,
        timeout: Duration,
    },
    #[error("{failed} of {total} worker(s) failed: {partitions}")]
    WorkersFailed {
        failed: usize,
        total: usize,
        partitions: String,
    },
    #[error("Worker task for '{partition}' did not complete: {source}")]
    WorkerJoin {
        partition: String,
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Latency histogram error: {message}")]
    Histogram { message: String },
}
