//! Health reports for the fixed agent set, one report per request.
use std::path::Path;

use async_trait::async_trait;

use crate::error::{AppError, PayloadError, ValidationError};
use crate::harness::{Batch, HarnessConfig, RunPlan, Workload};
use crate::payload::Document;

use super::{CounterInfo, threaded_plan};

pub const COUNTER: CounterInfo = CounterInfo {
    name: "Health Generator",
    help: "Milliseconds each health report took until the configuration manager answered.",
};

pub const HEALTH_TEMPLATE: &str = "<root><configuration>\
<attribute name=\"version\" value=\"-1\" />\
<attribute name=\"configid\" value=\"1\" />\
<attribute name=\"timestamp\" value=\"10/06/2009 17:46:11\" />\
<attribute name=\"host\" value=\"wbx-test-app\" />\
<attribute name=\"ip\" value=\"192.168.2.111\" />\
<attribute name=\"uid\" value=\"ADWPC\" />\
</configuration>\
<attribute name=\"type\" value=\"WPC\" />\
</root>";

/// Configuration version the agents report as current.
pub const CURRENT_CONFIGURATION_VERSION: i32 = 1;
const UPDATE_REQUEST_VERSION: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Wpc,
    Bam,
}

impl AgentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AgentKind::Wpc => "WPC",
            AgentKind::Bam => "BAM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub uid: &'static str,
    pub kind: AgentKind,
    pub config_id: u32,
}

/// WPC agents first, then BAM agents.
pub static AGENTS: [Agent; 5] = [
    Agent {
        uid: "ADWPC",
        kind: AgentKind::Wpc,
        config_id: 3,
    },
    Agent {
        uid: "ePOWPC",
        kind: AgentKind::Wpc,
        config_id: 5,
    },
    Agent {
        uid: "CPWPC",
        kind: AgentKind::Wpc,
        config_id: 4,
    },
    Agent {
        uid: "WSSBAM",
        kind: AgentKind::Bam,
        config_id: 1,
    },
    Agent {
        uid: "SAPR3BAM",
        kind: AgentKind::Bam,
        config_id: 2,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTest {
    /// Agents report the current configuration version.
    ReportCurrent,
    /// Agents report version -1, asking for a configuration update.
    RequestUpdate,
}

impl HealthTest {
    /// # Errors
    ///
    /// Returns `UnknownTestNumber` for anything but 1 or 2.
    pub const fn from_number(number: u32) -> Result<Self, ValidationError> {
        match number {
            1 => Ok(HealthTest::ReportCurrent),
            2 => Ok(HealthTest::RequestUpdate),
            _ => Err(ValidationError::UnknownTestNumber { number }),
        }
    }

    #[must_use]
    pub const fn version(self) -> i32 {
        match self {
            HealthTest::ReportCurrent => CURRENT_CONFIGURATION_VERSION,
            HealthTest::RequestUpdate => UPDATE_REQUEST_VERSION,
        }
    }
}

#[derive(Debug)]
pub struct HealthWorkload {
    test: HealthTest,
    position: usize,
}

impl HealthWorkload {
    #[must_use]
    pub const fn new(test: HealthTest) -> Self {
        Self { test, position: 0 }
    }
}

#[async_trait]
impl Workload for HealthWorkload {
    type Unit = &'static Agent;
    const LABELLED: bool = true;

    async fn rewind(&mut self) -> Result<(), AppError> {
        self.position = 0;
        Ok(())
    }

    async fn next_unit(&mut self) -> Result<Option<&'static Agent>, AppError> {
        let agent = AGENTS.get(self.position);
        if agent.is_some() {
            self.position = self.position.saturating_add(1);
        }
        Ok(agent)
    }

    fn new_document(&self) -> Result<Document, PayloadError> {
        Document::from_template(HEALTH_TEMPLATE)
    }

    fn append(&mut self, batch: &mut Batch, agent: &&'static Agent) -> Result<(), PayloadError> {
        let document = batch.document_mut();
        document.set_first_attr("uid", agent.uid)?;
        document.set_first_attr("type", agent.kind.as_str())?;
        document.set_first_attr("version", &self.test.version().to_string())?;
        document.set_first_attr("configid", &agent.config_id.to_string())?;
        batch.set_label(agent.uid);
        Ok(())
    }
}

/// `threads` workers, each reporting health for every agent per iteration.
#[must_use]
pub fn plan(
    test: HealthTest,
    threads: usize,
    output_dir: &Path,
    config: HarnessConfig,
) -> RunPlan<HealthWorkload> {
    threaded_plan(COUNTER.name, threads, output_dir, config, || {
        HealthWorkload::new(test)
    })
}
