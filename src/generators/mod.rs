//! The three workloads driven by the harness.
pub mod events;
pub mod health;
pub mod wpc;

use std::path::{Path, PathBuf};

use crate::harness::{HarnessConfig, Partition, RunPlan};

/// Timestamp format used inside generated payloads.
pub const PAYLOAD_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Counter name and description a generator registers for its workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterInfo {
    pub name: &'static str,
    pub help: &'static str,
}

/// `"<counter name> <pid>_thread_<index>"`, the partition name of a
/// thread-partitioned run.
#[must_use]
pub fn thread_partition_name(counter: &str, process_id: u32, index: usize) -> String {
    format!("{} {}_thread_{}", counter, process_id, index)
}

/// Plan with `threads` identical partitions, each built by `workload`.
#[must_use]
pub fn threaded_plan<W, F>(
    counter: &str,
    threads: usize,
    output_dir: &Path,
    config: HarnessConfig,
    mut workload: F,
) -> RunPlan<W>
where
    F: FnMut() -> W,
{
    let process_id = std::process::id();
    let partitions = (0..threads)
        .map(|index| {
            let name = thread_partition_name(counter, process_id, index);
            Partition {
                results_path: results_path(output_dir, &name),
                name,
                workload: workload(),
            }
        })
        .collect();
    RunPlan { config, partitions }
}

fn results_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.csv", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn threaded_plan_names_each_partition() {
        let config = HarnessConfig {
            batch_size: 1,
            delay: Duration::ZERO,
            iterations: 1,
            shutdown_timeout: None,
        };
        let mut built = 0usize;
        let plan = threaded_plan("Health Generator", 2, Path::new("out"), config, || {
            built = built.saturating_add(1);
            built
        });

        let pid = std::process::id();
        let names: Vec<&str> = plan.partitions.iter().map(|part| part.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                format!("Health Generator {}_thread_0", pid),
                format!("Health Generator {}_thread_1", pid),
            ]
        );
        let last = plan.partitions.last().map(|part| (part.workload, part.results_path.clone()));
        assert_eq!(
            last,
            Some((
                2,
                PathBuf::from(format!("out/Health Generator {}_thread_1.csv", pid))
            ))
        );
    }
}
