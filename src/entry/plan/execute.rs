use tracing::{info, warn};

use crate::error::{AppError, AppResult, HarnessError, SinkError};
use crate::generators::{CounterInfo, events, health, wpc};
use crate::harness::{self, Workload};
use crate::metrics::RunSummary;
use crate::remote::{HttpServiceFactory, Operation};
use crate::sinks::CounterRegistry;

use super::types::{RunPlan, RunSettings};

pub(crate) async fn execute_plan(plan: RunPlan) -> AppResult<()> {
    match plan {
        RunPlan::Events {
            settings,
            index,
            config,
        } => {
            let files = events::read_index(&index).await?;
            info!(
                "Replaying {} event file(s) listed in {}",
                files.len(),
                index.display()
            );
            let run = events::plan(&files, &settings.output_dir, config);
            drive(run, &settings, Operation::ReportEvents, events::COUNTER).await
        }
        RunPlan::Health {
            settings,
            test,
            threads,
            config,
        } => {
            info!(
                "Reporting health with configuration version {} from {} worker(s)",
                test.version(),
                threads
            );
            let run = health::plan(test, threads, &settings.output_dir, config);
            drive(run, &settings, Operation::ReportHealth, health::COUNTER).await
        }
        RunPlan::Wpc {
            settings,
            test,
            identity,
            threads,
            config,
        } => {
            info!(
                "Fetching policy data for {} as {}@{} from {} worker(s)",
                test.agent_uid(),
                identity.user,
                identity.ip_address,
                threads
            );
            let run = wpc::plan(&identity, threads, &settings.output_dir, config);
            let operation = Operation::FetchPolicyData {
                agent: test.agent_uid().to_owned(),
            };
            drive(run, &settings, operation, wpc::COUNTER).await
        }
    }
}

async fn drive<W>(
    run: harness::RunPlan<W>,
    settings: &RunSettings,
    operation: Operation,
    counter: CounterInfo,
) -> AppResult<()>
where
    W: Workload + 'static,
{
    tokio::fs::create_dir_all(&settings.output_dir)
        .await
        .map_err(|err| SinkError::CreateDir {
            path: settings.output_dir.clone(),
            source: err,
        })?;

    let factory = HttpServiceFactory::new(settings.http.clone(), operation);
    let mut counters = CounterRegistry::new(counter.name, counter.help)
        .with_prometheus_path(settings.prometheus_path.clone());
    info!(
        "Counter '{}' created for process {}",
        counter.name,
        std::process::id()
    );

    let summary = harness::run(run, &factory, &mut counters).await?;
    for line in summary.lines() {
        info!("{}", line);
    }
    report_failures(&summary)
}

fn report_failures(summary: &RunSummary) -> AppResult<()> {
    let failed = summary.failed_partitions();
    if failed.is_empty() {
        return Ok(());
    }
    for partition in failed {
        warn!("Worker '{}' did not complete its iterations", partition);
    }
    Err(AppError::harness(HarnessError::WorkersFailed {
        failed: failed.len(),
        total: summary.workers().len().saturating_add(failed.len()),
        partitions: failed.join(", "),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::WorkerReport;
    use std::time::Duration;

    #[test]
    fn failed_partitions_fail_the_run() -> AppResult<()> {
        let healthy = WorkerReport::new("ok.csv")?;
        let clean = RunSummary::from_reports(vec![healthy], Duration::from_secs(1))?;
        report_failures(&clean)?;

        let survivor = WorkerReport::new("ok.csv")?;
        let broken = RunSummary::from_reports(vec![survivor], Duration::from_secs(1))?
            .with_failures(vec!["a.csv".to_owned(), "b.csv".to_owned()]);
        match report_failures(&broken) {
            Err(AppError::Harness(HarnessError::WorkersFailed {
                failed,
                total,
                partitions,
            })) if failed == 2 && total == 3 && partitions == "a.csv, b.csv" => Ok(()),
            other => Err(AppError::validation(format!("Unexpected outcome: {:?}", other))),
        }
    }
}
