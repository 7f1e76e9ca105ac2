//! Output sinks: per-worker CSV result files and the monitoring counters.
mod counters;
mod format;
mod results;

pub use counters::{CounterHandle, CounterRegistry};
pub use results::{FileSink, HEADER_TIMESTAMP_LABEL, ResultSink, TIMESTAMP_FORMAT};
