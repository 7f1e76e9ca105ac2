use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::args::parse_duration_arg;
use crate::error::AppResult;

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub timeout: Option<DurationValue>,
    pub shutdown_timeout: Option<DurationValue>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MonitoringConfig {
    pub prometheus_path: Option<PathBuf>,
}

/// Either a number of seconds or a string such as `"500ms"`, `"10s"`, `"2m"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> AppResult<Duration> {
        match self {
            DurationValue::Seconds(secs) => parse_duration_arg(&secs.to_string()),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
