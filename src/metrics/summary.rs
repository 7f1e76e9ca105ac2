use std::time::Duration;

use crate::error::HarnessError;

use super::LatencyHistogram;

/// What one worker did over all of its iterations.
#[derive(Debug, Clone)]
pub struct WorkerReport {
    partition: String,
    successes: u64,
    errors: u64,
    failed_units: u64,
    discarded_units: u64,
    histogram: LatencyHistogram,
}

impl WorkerReport {
    /// # Errors
    ///
    /// Returns an error if the latency histogram cannot be created.
    pub fn new(partition: &str) -> Result<Self, HarnessError> {
        Ok(Self {
            partition: partition.to_owned(),
            successes: 0,
            errors: 0,
            failed_units: 0,
            discarded_units: 0,
            histogram: LatencyHistogram::new()?,
        })
    }

    /// # Errors
    ///
    /// Returns an error if the latency cannot be recorded.
    pub fn record_success(&mut self, elapsed_ms: u64) -> Result<(), HarnessError> {
        self.successes = self.successes.saturating_add(1);
        self.histogram.record(elapsed_ms)
    }

    pub fn record_error(&mut self) {
        self.errors = self.errors.saturating_add(1);
    }

    pub fn record_failed_unit(&mut self) {
        self.failed_units = self.failed_units.saturating_add(1);
    }

    pub fn record_discarded(&mut self, units: usize) {
        let units = u64::try_from(units).unwrap_or(u64::MAX);
        self.discarded_units = self.discarded_units.saturating_add(units);
    }

    #[must_use]
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Result rows written (successes plus error rows).
    #[must_use]
    pub const fn rows(&self) -> u64 {
        self.successes.saturating_add(self.errors)
    }

    #[must_use]
    pub const fn successes(&self) -> u64 {
        self.successes
    }

    #[must_use]
    pub const fn errors(&self) -> u64 {
        self.errors
    }

    #[must_use]
    pub const fn failed_units(&self) -> u64 {
        self.failed_units
    }

    #[must_use]
    pub const fn discarded_units(&self) -> u64 {
        self.discarded_units
    }

    #[must_use]
    pub const fn histogram(&self) -> &LatencyHistogram {
        &self.histogram
    }
}

#[derive(Debug)]
pub struct RunSummary {
    workers: Vec<WorkerReport>,
    failed: Vec<String>,
    merged: LatencyHistogram,
    duration: Duration,
}

impl RunSummary {
    /// # Errors
    ///
    /// Returns an error if the worker histograms cannot be merged.
    pub fn from_reports(workers: Vec<WorkerReport>, duration: Duration) -> Result<Self, HarnessError> {
        let mut merged = LatencyHistogram::new()?;
        for report in &workers {
            merged.merge(report.histogram())?;
        }
        Ok(Self {
            workers,
            failed: Vec::new(),
            merged,
            duration,
        })
    }

    /// Records partitions whose worker stopped before completing.
    #[must_use]
    pub fn with_failures(mut self, failed: Vec<String>) -> Self {
        self.failed = failed;
        self
    }

    #[must_use]
    pub fn failed_partitions(&self) -> &[String] {
        &self.failed
    }

    #[must_use]
    pub fn workers(&self) -> &[WorkerReport] {
        &self.workers
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub const fn latency(&self) -> &LatencyHistogram {
        &self.merged
    }

    #[must_use]
    pub fn total_rows(&self) -> u64 {
        self.workers
            .iter()
            .fold(0u64, |total, report| total.saturating_add(report.rows()))
    }

    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.workers
            .iter()
            .fold(0u64, |total, report| total.saturating_add(report.errors()))
    }

    /// Human-readable summary, one entry per line.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.workers.len().saturating_add(3));
        let (p50, p90, p99) = self.merged.percentiles();
        lines.push(format!(
            "Run finished in {} ms: {} requests, {} errors",
            self.duration.as_millis(),
            self.total_rows(),
            self.total_errors()
        ));
        lines.push(format!(
            "Latency ms: min {}, p50 {}, p90 {}, p99 {}, max {}",
            self.merged.min(),
            p50,
            p90,
            p99,
            self.merged.max()
        ));
        for report in &self.workers {
            let (worker_p50, _, worker_p99) = report.histogram().percentiles();
            let mut parts = vec![format!(
                "{}: {} ok, {} errors, p50 {} ms, p99 {} ms",
                report.partition(),
                report.successes(),
                report.errors(),
                worker_p50,
                worker_p99
            )];
            if report.failed_units() > 0 {
                parts.push(format!("{} failed units", report.failed_units()));
            }
            if report.discarded_units() > 0 {
                parts.push(format!("{} unsent units", report.discarded_units()));
            }
            lines.push(parts.join(", "));
        }
        for partition in &self.failed {
            lines.push(format!("{}: stopped early, see the log", partition));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_merges_worker_latencies() -> Result<(), HarnessError> {
        let mut first = WorkerReport::new("a.csv")?;
        first.record_success(10)?;
        first.record_success(30)?;
        first.record_error();
        let mut second = WorkerReport::new("b.csv")?;
        second.record_success(20)?;
        second.record_discarded(1);

        let summary = RunSummary::from_reports(vec![first, second], Duration::from_millis(250))?;
        assert_eq!(summary.total_rows(), 4);
        assert_eq!(summary.total_errors(), 1);
        assert_eq!(summary.latency().count(), 3);
        assert_eq!(summary.latency().min(), 10);

        let lines = summary.lines();
        assert_eq!(
            lines.first().map(String::as_str),
            Some("Run finished in 250 ms: 4 requests, 1 errors")
        );
        assert!(lines.iter().any(|line| line.starts_with("b.csv: 1 ok") && line.ends_with("1 unsent units")));
        Ok(())
    }

    #[test]
    fn empty_histogram_reports_zeros() -> Result<(), HarnessError> {
        let histogram = LatencyHistogram::new()?;
        assert_eq!(histogram.percentiles(), (0, 0, 0));
        assert_eq!(histogram.min(), 0);
        Ok(())
    }
}
