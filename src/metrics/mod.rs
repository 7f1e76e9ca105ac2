//! Latency accounting for worker reports and the end-of-run summary.
mod histogram;
mod summary;

pub use histogram::LatencyHistogram;
pub use summary::{RunSummary, WorkerReport};
