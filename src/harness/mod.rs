//! Concurrent load harness: one task per partition, a shared start barrier,
//! batched requests and one result file per worker.
mod batch;
mod completion;
mod request_loop;


use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWrite;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::error::{AppResult, HarnessError, ValidationError};
use crate::metrics::RunSummary;
use crate::remote::{RemoteFactory, RemoteService};
use crate::sinks::{CounterRegistry, FileSink, ResultSink};

pub use batch::Batch;
pub use completion::{CompletionTracker, FinishGuard};
pub use request_loop::{Worker, WorkerOutcome, Workload, is_error_response};

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub batch_size: usize,
    pub delay: Duration,
    pub iterations: usize,
    pub shutdown_timeout: Option<Duration>,
}

impl HarnessConfig {
    /// # Errors
    ///
    /// Returns an error when the batch size or iteration count is zero.
    pub const fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 {
            return Err(ValidationError::BatchSizeZero);
        }
        if self.iterations == 0 {
            return Err(ValidationError::IterationsZero);
        }
        Ok(())
    }
}

/// One worker's share of the run: its input and where its rows go.
#[derive(Debug)]
pub struct Partition<W> {
    pub name: String,
    pub results_path: PathBuf,
    pub workload: W,
}

#[derive(Debug)]
pub struct RunPlan<W> {
    pub config: HarnessConfig,
    pub partitions: Vec<Partition<W>>,
}

/// A partition whose sink and remote service are already open.
pub struct Assignment<W, S> {
    pub partition: String,
    pub workload: W,
    pub sink: ResultSink<S>,
    pub remote: Box<dyn RemoteService>,
}

/// Result of [`execute`]: the summary plus the closed sinks.
#[derive(Debug)]
pub struct Execution<S> {
    pub summary: RunSummary,
    pub sinks: Vec<(String, ResultSink<S>)>,
    pub finished: usize,
}

/// Runs `plan` against result files and services built by `remote_factory`.
///
/// Sinks and services are created for every partition before any worker
/// starts, so a bad output path fails the whole run up front.
///
/// # Errors
///
/// Returns an error for an invalid configuration, a sink that cannot be
/// opened, a service that cannot be built, or a shutdown timeout.
pub async fn run<W, F>(
    plan: RunPlan<W>,
    remote_factory: &F,
    counters: &mut CounterRegistry,
) -> AppResult<RunSummary>
where
    W: Workload + 'static,
    F: RemoteFactory + ?Sized,
{
    plan.config.validate()?;
    if plan.partitions.is_empty() {
        return Err(ValidationError::NoPartitions.into());
    }

    let mut assignments = Vec::with_capacity(plan.partitions.len());
    for partition in plan.partitions {
        let sink = FileSink::open(&partition.results_path).await?;
        let remote = remote_factory.create(&partition.name)?;
        info!(
            "Partition '{}' writes to {}",
            partition.name,
            partition.results_path.display()
        );
        assignments.push(Assignment {
            partition: partition.name,
            workload: partition.workload,
            sink,
            remote,
        });
    }

    let execution = execute(&plan.config, assignments, counters).await?;
    Ok(execution.summary)
}

/// Spawns one worker per assignment, waits for all of them to finish and
/// gathers their reports.
///
/// # Errors
///
/// Returns an error for an invalid configuration, an empty assignment list,
/// or when the shutdown timeout elapses first.
pub async fn execute<W, S>(
    config: &HarnessConfig,
    assignments: Vec<Assignment<W, S>>,
    counters: &mut CounterRegistry,
) -> AppResult<Execution<S>>
where
    W: Workload + 'static,
    S: AsyncWrite + Unpin + Send + 'static,
{
    config.validate()?;
    if assignments.is_empty() {
        return Err(ValidationError::NoPartitions.into());
    }

    let total = assignments.len();
    let tracker = Arc::new(CompletionTracker::new(total));
    let started = Instant::now();

    let mut handles = Vec::with_capacity(total);
    for assignment in assignments {
        let counter = counters.create_instance(&assignment.partition);
        let worker = Worker {
            partition: assignment.partition.clone(),
            workload: assignment.workload,
            sink: assignment.sink,
            remote: assignment.remote,
            counter,
            tracker: Arc::clone(&tracker),
            config: config.clone(),
        };
        handles.push((assignment.partition, tokio::spawn(worker.run_partition())));
    }
    info!("Started {} worker(s)", total);

    if let Some(limit) = config.shutdown_timeout {
        if tokio::time::timeout(limit, tracker.wait_all()).await.is_err() {
            let finished = tracker.finished();
            for (_, handle) in &handles {
                handle.abort();
            }
            remove_counters(counters).await;
            return Err(HarnessError::ShutdownTimeout {
                finished,
                total,
                timeout: limit,
            }
            .into());
        }
    } else {
        tracker.wait_all().await;
    }
    let duration = started.elapsed();

    let mut reports = Vec::with_capacity(total);
    let mut sinks = Vec::with_capacity(total);
    let mut failed = Vec::new();
    for (partition, handle) in handles {
        match handle.await {
            Ok(outcome) => {
                let mut sink = outcome.sink;
                if let Err(err) = sink.close().await {
                    warn!("Failed to close results of '{}': {}", partition, err);
                }
                match outcome.report {
                    Ok(report) => reports.push(report),
                    Err(_) => failed.push(partition.clone()),
                }
                sinks.push((partition, sink));
            }
            Err(err) => {
                let failure = HarnessError::WorkerJoin {
                    partition: partition.clone(),
                    source: err,
                };
                error!("{}", failure);
                failed.push(partition);
            }
        }
    }
    remove_counters(counters).await;

    let summary = RunSummary::from_reports(reports, duration)?.with_failures(failed);

    Ok(Execution {
        summary,
        sinks,
        finished: tracker.finished(),
    })
}

async fn remove_counters(counters: &mut CounterRegistry) {
    if let Err(err) = counters.remove_instances().await {
        warn!(
            "Failed to remove counter instances of '{}': {}",
            counters.counter(),
            err
        );
    }
}
