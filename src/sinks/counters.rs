use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::error::SinkError;

use super::format::{label_value, write_line};

#[derive(Debug, Default)]
struct CounterState {
    last_ms: AtomicU64,
    samples: AtomicU64,
}

/// One named counter instance, shared with the worker that updates it.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    instance: Arc<str>,
    state: Arc<CounterState>,
}

impl CounterHandle {
    /// Records the duration of the latest request.
    pub fn set(&self, elapsed_ms: u64) {
        self.state.last_ms.store(elapsed_ms, Ordering::Relaxed);
        self.state.samples.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn instance(&self) -> &str {
        &self.instance
    }

    #[must_use]
    pub fn value(&self) -> u64 {
        self.state.last_ms.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn samples(&self) -> u64 {
        self.state.samples.load(Ordering::Relaxed)
    }
}

/// Multi-instance counter (one instance per worker) holding the last
/// request duration in milliseconds.
#[derive(Debug)]
pub struct CounterRegistry {
    counter: String,
    help: String,
    prometheus_path: Option<PathBuf>,
    instances: Vec<CounterHandle>,
}

impl CounterRegistry {
    #[must_use]
    pub fn new(counter: &str, help: &str) -> Self {
        Self {
            counter: counter.to_owned(),
            help: help.to_owned(),
            prometheus_path: None,
            instances: Vec::new(),
        }
    }

    /// Writes a Prometheus text snapshot to `path` when instances are removed.
    #[must_use]
    pub fn with_prometheus_path(mut self, path: Option<PathBuf>) -> Self {
        self.prometheus_path = path;
        self
    }

    #[must_use]
    pub fn counter(&self) -> &str {
        &self.counter
    }

    #[must_use]
    pub fn prometheus_path(&self) -> Option<&Path> {
        self.prometheus_path.as_deref()
    }

    /// Creates the instance `name`, or returns the existing one.
    pub fn create_instance(&mut self, name: &str) -> CounterHandle {
        if let Some(existing) = self.instances.iter().find(|handle| handle.instance() == name) {
            return existing.clone();
        }
        let handle = CounterHandle {
            instance: Arc::from(name),
            state: Arc::new(CounterState::default()),
        };
        debug!("Created counter instance '{}' of '{}'", name, self.counter);
        self.instances.push(handle.clone());
        handle
    }

    #[must_use]
    pub fn instances(&self) -> &[CounterHandle] {
        &self.instances
    }

    /// Prometheus text exposition of every live instance.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::WriteLine` when formatting fails.
    pub fn render_prometheus(&self) -> Result<String, SinkError> {
        let mut output = String::new();
        let counter = label_value(&self.counter);

        write_line(
            &mut output,
            &format!("# HELP barrage_last_request_ms {}", self.help),
        )?;
        write_line(&mut output, "# TYPE barrage_last_request_ms gauge")?;
        for handle in &self.instances {
            write_line(
                &mut output,
                &format!(
                    "barrage_last_request_ms{{counter=\"{}\",instance=\"{}\"}} {}",
                    counter,
                    label_value(handle.instance()),
                    handle.value()
                ),
            )?;
        }

        write_line(
            &mut output,
            "# HELP barrage_requests_total Requests measured per instance.",
        )?;
        write_line(&mut output, "# TYPE barrage_requests_total counter")?;
        for handle in &self.instances {
            write_line(
                &mut output,
                &format!(
                    "barrage_requests_total{{counter=\"{}\",instance=\"{}\"}} {}",
                    counter,
                    label_value(handle.instance()),
                    handle.samples()
                ),
            )?;
        }
        Ok(output)
    }

    /// Removes every instance, exporting their final values first when an
    /// export path is configured. Returns the number of removed instances.
    ///
    /// # Errors
    ///
    /// Returns an error when the export cannot be written; the instances are
    /// removed regardless.
    pub async fn remove_instances(&mut self) -> Result<usize, SinkError> {
        let export = self
            .prometheus_path
            .as_ref()
            .map(|path| (path.clone(), self.render_prometheus()));
        let removed = self.instances.len();
        self.instances.clear();

        if let Some((path, rendered)) = export {
            let output = rendered?;
            tokio::fs::write(&path, output)
                .await
                .map_err(|err| SinkError::WritePrometheus { path, source: err })?;
        }
        Ok(removed)
    }
}
