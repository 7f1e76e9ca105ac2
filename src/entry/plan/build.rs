use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::args::{BarrageArgs, Command};
use crate::config::{apply_config, load_config};
use crate::error::{AppResult, ValidationError};
use crate::generators::health::HealthTest;
use crate::generators::wpc::{ClientIdentity, WpcTest};
use crate::harness::HarnessConfig;
use crate::remote::HttpSettings;

use super::types::{RunPlan, RunSettings};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_OUTPUT_DIR: &str = ".";
/// Health reports and policy-data fetches go out one unit per request.
const SINGLE_UNIT_BATCH: usize = 1;

pub(crate) fn build_plan(mut args: BarrageArgs) -> AppResult<RunPlan> {
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &config)?;
    }

    let endpoint = match resolve_endpoint(args.endpoint.as_deref()) {
        Ok(endpoint) => endpoint,
        Err(err) => {
            tracing::error!("{}", err);
            return Err(err.into());
        }
    };
    let settings = RunSettings {
        http: HttpSettings {
            endpoint,
            request_timeout: args.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        },
        output_dir: args
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        prometheus_path: args.prometheus_path,
    };
    let shutdown_timeout = args.shutdown_timeout;

    match args.command {
        Command::Events(events) => Ok(RunPlan::Events {
            settings,
            index: events.index_file,
            config: HarnessConfig {
                batch_size: events.events_in_send.get(),
                delay: Duration::from_millis(events.delay_ms),
                iterations: events.iterations.get(),
                shutdown_timeout,
            },
        }),
        Command::Health(health) => Ok(RunPlan::Health {
            settings,
            test: HealthTest::from_number(health.test_number)?,
            threads: health.threads.get(),
            config: HarnessConfig {
                batch_size: SINGLE_UNIT_BATCH,
                delay: Duration::from_millis(health.delay_ms),
                iterations: health.iterations.get(),
                shutdown_timeout,
            },
        }),
        Command::Wpc(wpc) => Ok(RunPlan::Wpc {
            settings,
            test: WpcTest::from_number(wpc.test_number)?,
            identity: ClientIdentity {
                ip_address: wpc.client_ip,
                user: wpc.user,
            },
            threads: wpc.threads.get(),
            config: HarnessConfig {
                batch_size: SINGLE_UNIT_BATCH,
                delay: Duration::from_millis(wpc.delay_ms),
                iterations: wpc.iterations.get(),
                shutdown_timeout,
            },
        }),
    }
}

fn resolve_endpoint(raw: Option<&str>) -> Result<Url, ValidationError> {
    let value = raw.ok_or(ValidationError::MissingEndpoint)?;
    let url = Url::parse(value).map_err(|err| ValidationError::InvalidEndpoint {
        url: value.to_owned(),
        source: err,
    })?;
    if url.cannot_be_a_base() {
        return Err(ValidationError::EndpointNotBase {
            url: value.to_owned(),
        });
    }
    Ok(url)
}
