use std::path::PathBuf;

use crate::generators::health::HealthTest;
use crate::generators::wpc::{ClientIdentity, WpcTest};
use crate::harness::HarnessConfig;
use crate::remote::HttpSettings;

/// Settings shared by every generator.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) http: HttpSettings,
    pub(crate) output_dir: PathBuf,
    pub(crate) prometheus_path: Option<PathBuf>,
}

#[derive(Debug)]
pub(crate) enum RunPlan {
    Events {
        settings: RunSettings,
        index: PathBuf,
        config: HarnessConfig,
    },
    Health {
        settings: RunSettings,
        test: HealthTest,
        threads: usize,
        config: HarnessConfig,
    },
    Wpc {
        settings: RunSettings,
        test: WpcTest,
        identity: ClientIdentity,
        threads: usize,
        config: HarnessConfig,
    },
}
