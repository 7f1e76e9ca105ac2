use crate::args::BarrageArgs;
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue};

/// Fills every option the command line left unset from `config`.
///
/// # Errors
///
/// Returns an error when a config duration is invalid.
pub fn apply_config(args: &mut BarrageArgs, config: &ConfigFile) -> AppResult<()> {
    if args.endpoint.is_none() {
        args.endpoint.clone_from(&config.endpoint);
    }

    if args.output_dir.is_none() {
        args.output_dir.clone_from(&config.output_dir);
    }

    if args.timeout.is_none()
        && let Some(value) = config.timeout.as_ref()
    {
        args.timeout = Some(config_duration(value, "timeout")?);
    }

    if args.shutdown_timeout.is_none()
        && let Some(value) = config.shutdown_timeout.as_ref()
    {
        args.shutdown_timeout = Some(config_duration(value, "shutdown_timeout")?);
    }

    if args.prometheus_path.is_none()
        && let Some(monitoring) = config.monitoring.as_ref()
    {
        args.prometheus_path.clone_from(&monitoring.prometheus_path);
    }

    Ok(())
}

fn config_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidField {
            field,
            message: err.to_string(),
        })
    })
}
