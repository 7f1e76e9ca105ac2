use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tokio::io::AsyncWrite;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::error::{AppError, PayloadError};
use crate::metrics::WorkerReport;
use crate::payload::Document;
use crate::remote::RemoteService;
use crate::sinks::{CounterHandle, ResultSink};
use crate::timing;

use super::{Batch, CompletionTracker, HarnessConfig};

/// Source of work units for one partition and the way they are folded into
/// a request payload.
#[async_trait]
pub trait Workload: Send {
    type Unit: Send + Sync;

    /// Whether result rows carry a label column.
    const LABELLED: bool;

    /// One-time setup before the start barrier (open inputs, bind fields).
    ///
    /// # Errors
    ///
    /// Any error here stops the worker.
    async fn prepare(&mut self) -> Result<(), AppError> {
        Ok(())
    }

    /// Restarts the unit sequence for a new iteration.
    ///
    /// # Errors
    ///
    /// Any error here stops the worker.
    async fn rewind(&mut self) -> Result<(), AppError>;

    /// # Errors
    ///
    /// Any error here stops the worker.
    async fn next_unit(&mut self) -> Result<Option<Self::Unit>, AppError>;

    /// Fresh payload skeleton for an empty batch.
    ///
    /// # Errors
    ///
    /// Any error here stops the worker.
    fn new_document(&self) -> Result<Document, PayloadError>;

    /// Adds one unit to `batch`. On error the harness rolls the unit back
    /// and continues with the next one.
    ///
    /// # Errors
    ///
    /// Returns the unit-level failure.
    fn append(&mut self, batch: &mut Batch, unit: &Self::Unit) -> Result<(), PayloadError>;
}

/// Everything one worker task owns.
pub struct Worker<W, S> {
    pub(super) partition: String,
    pub(super) workload: W,
    pub(super) sink: ResultSink<S>,
    pub(super) remote: Box<dyn RemoteService>,
    pub(super) counter: CounterHandle,
    pub(super) tracker: Arc<CompletionTracker>,
    pub(super) config: HarnessConfig,
}

/// What a worker task hands back when it ends.
#[derive(Debug)]
pub struct WorkerOutcome<S> {
    pub partition: String,
    pub report: Result<WorkerReport, AppError>,
    pub sink: ResultSink<S>,
}

impl<W, S> Worker<W, S>
where
    W: Workload,
    S: AsyncWrite + Unpin + Send,
{
    /// Runs the request loop for this partition. The worker always arrives
    /// at the start barrier and always counts as finished, even on failure.
    pub async fn run_partition(mut self) -> WorkerOutcome<S> {
        let guard = self.tracker.finish_guard();

        let setup = self.setup().await;
        self.tracker.arrive().await;
        let report = match setup {
            Ok(()) => self.drive().await,
            Err(err) => Err(err),
        };
        if let Err(err) = &report {
            error!("Worker '{}' stopped: {}", self.partition, err);
        }

        drop(guard);
        WorkerOutcome {
            partition: self.partition,
            report,
            sink: self.sink,
        }
    }

    async fn setup(&mut self) -> Result<(), AppError> {
        self.sink.write_header(W::LABELLED).await?;
        self.workload.prepare().await
    }

    async fn drive(&mut self) -> Result<WorkerReport, AppError> {
        let mut report = WorkerReport::new(&self.partition)?;

        for iteration in 1..=self.config.iterations {
            self.workload.rewind().await?;
            let mut pending: Option<Batch> = None;
            let mut sequence: u64 = 0;

            while let Some(unit) = self.workload.next_unit().await? {
                sequence = sequence.saturating_add(1);
                let mut batch = match pending.take() {
                    Some(existing) if !existing.is_empty() => existing,
                    Some(_) | None => Batch::new(self.workload.new_document()?),
                };

                let mark = batch.mark();
                match self.workload.append(&mut batch, &unit) {
                    Ok(()) => batch.commit(),
                    Err(err) => {
                        error!(
                            "Unit {} of '{}' (iteration {}) skipped: {}",
                            sequence, self.partition, iteration, err
                        );
                        report.record_failed_unit();
                        batch.rollback(mark)?;
                    }
                }

                if batch.entries() >= self.config.batch_size {
                    self.send(&batch, &mut report).await?;
                } else {
                    pending = Some(batch);
                }
            }

            if let Some(partial) = pending.filter(|batch| !batch.is_empty()) {
                warn!(
                    "Discarding {} unsent unit(s) of '{}' at the end of iteration {}",
                    partial.entries(),
                    self.partition,
                    iteration
                );
                report.record_discarded(partial.entries());
            }
        }

        debug!(
            "Worker '{}' finished: {} rows",
            self.partition,
            report.rows()
        );
        Ok(report)
    }

    async fn send(&mut self, batch: &Batch, report: &mut WorkerReport) -> Result<(), AppError> {
        let payload = batch.document().to_xml();

        let started = Instant::now();
        let outcome = self.remote.send(&payload).await;
        let elapsed_ms = timing::elapsed_millis(started.elapsed());

        self.counter.set(elapsed_ms);
        let now = Local::now();
        match outcome {
            Ok(response) if is_error_response(&response) => {
                debug!("'{}' got an error response: {}", self.partition, response);
                self.sink.write_error(now, batch.label(), &response).await?;
                report.record_error();
            }
            Ok(_) => {
                self.sink
                    .write_success(now, batch.label(), elapsed_ms)
                    .await?;
                report.record_success(elapsed_ms)?;
            }
            Err(err) => {
                warn!("Request from '{}' failed: {}", self.partition, err);
                self.sink
                    .write_error(now, batch.label(), &err.to_string())
                    .await?;
                report.record_error();
            }
        }

        tokio::time::sleep(self.config.delay).await;
        Ok(())
    }
}

/// A response reports a failure when it mentions "error" in any case.
#[must_use]
pub fn is_error_response(response: &str) -> bool {
    response.to_lowercase().contains("error")
}
