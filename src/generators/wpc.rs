//! Policy-data fetches on behalf of one WPC agent.
use std::path::Path;

use async_trait::async_trait;
use chrono::Local;

use crate::error::{AppError, PayloadError, ValidationError};
use crate::harness::{Batch, HarnessConfig, RunPlan, Workload};
use crate::payload::Document;
use crate::policy::Section;

use super::{CounterInfo, PAYLOAD_TIMESTAMP_FORMAT, threaded_plan};

pub const COUNTER: CounterInfo = CounterInfo {
    name: "WPC Data Request Generator",
    help: "Milliseconds each policy-data request took until the WPC framework service answered.",
};

pub const WPC_TEMPLATE: &str = "<root><policydata>\
<attribute name=\"TimeStamp\" value=\"\" />\
<attribute name=\"IpAddress\" value=\"\" />\
<attribute name=\"UserName\" value=\"\" />\
</policydata></root>";

pub const DEFAULT_CLIENT_IP: &str = "192.168.2.116";
pub const DEFAULT_USER: &str = "user1";

const TIME_STAMP: &str = "TimeStamp";
const IP_ADDRESS: &str = "IpAddress";
const USER_NAME: &str = "UserName";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WpcTest {
    ActiveDirectory,
    EPolicyOrchestrator,
    CheckPoint,
}

impl WpcTest {
    /// # Errors
    ///
    /// Returns `UnknownTestNumber` for anything outside 1..=3.
    pub const fn from_number(number: u32) -> Result<Self, ValidationError> {
        match number {
            1 => Ok(WpcTest::ActiveDirectory),
            2 => Ok(WpcTest::EPolicyOrchestrator),
            3 => Ok(WpcTest::CheckPoint),
            _ => Err(ValidationError::UnknownTestNumber { number }),
        }
    }

    /// Agent the requests are made for.
    #[must_use]
    pub const fn agent_uid(self) -> &'static str {
        match self {
            WpcTest::ActiveDirectory => "ADWPC",
            WpcTest::EPolicyOrchestrator => "ePOWPC",
            WpcTest::CheckPoint => "CPWPC",
        }
    }
}

/// Client identity sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub ip_address: String,
    pub user: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            ip_address: DEFAULT_CLIENT_IP.to_owned(),
            user: DEFAULT_USER.to_owned(),
        }
    }
}

/// A single request per iteration, stamped with the time it was built.
#[derive(Debug)]
pub struct WpcWorkload {
    identity: ClientIdentity,
    emitted: bool,
}

impl WpcWorkload {
    #[must_use]
    pub const fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            emitted: false,
        }
    }
}

#[async_trait]
impl Workload for WpcWorkload {
    type Unit = ();
    const LABELLED: bool = false;

    async fn rewind(&mut self) -> Result<(), AppError> {
        self.emitted = false;
        Ok(())
    }

    async fn next_unit(&mut self) -> Result<Option<()>, AppError> {
        if self.emitted {
            return Ok(None);
        }
        self.emitted = true;
        Ok(Some(()))
    }

    fn new_document(&self) -> Result<Document, PayloadError> {
        Document::from_template(WPC_TEMPLATE)
    }

    fn append(&mut self, batch: &mut Batch, _unit: &()) -> Result<(), PayloadError> {
        let path = Section::PolicyData.tag();
        let stamp = Local::now().format(PAYLOAD_TIMESTAMP_FORMAT).to_string();
        let document = batch.document_mut();
        document.add_attr_pair(path, TIME_STAMP, &stamp)?;
        document.add_attr_pair(path, IP_ADDRESS, &self.identity.ip_address)?;
        document.add_attr_pair(path, USER_NAME, &self.identity.user)
    }
}

/// `threads` workers, each fetching policy data once per iteration.
#[must_use]
pub fn plan(
    identity: &ClientIdentity,
    threads: usize,
    output_dir: &Path,
    config: HarnessConfig,
) -> RunPlan<WpcWorkload> {
    threaded_plan(COUNTER.name, threads, output_dir, config, || {
        WpcWorkload::new(identity.clone())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn test_numbers_select_agents() -> Result<(), ValidationError> {
        assert_eq!(WpcTest::from_number(1)?.agent_uid(), "ADWPC");
        assert_eq!(WpcTest::from_number(2)?.agent_uid(), "ePOWPC");
        assert_eq!(WpcTest::from_number(3)?.agent_uid(), "CPWPC");
        assert!(matches!(
            WpcTest::from_number(0),
            Err(ValidationError::UnknownTestNumber { number: 0 })
        ));
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn each_iteration_yields_one_request() -> Result<(), AppError> {
        let mut workload = WpcWorkload::new(ClientIdentity::default());
        for _ in 0..3 {
            workload.rewind().await?;
            assert_eq!(workload.next_unit().await?, Some(()));
            assert_eq!(workload.next_unit().await?, None);
        }
        Ok(())
    }

    #[tokio::test(flavor = "current_thread")]
    async fn request_carries_time_and_client_identity() -> Result<(), AppError> {
        let identity = ClientIdentity {
            ip_address: "10.0.0.7".to_owned(),
            user: "alice".to_owned(),
        };
        let mut workload = WpcWorkload::new(identity);
        let mut batch = Batch::new(workload.new_document()?);
        workload.append(&mut batch, &())?;

        let document = batch.document();
        let policy = document.select("policydata")?;
        assert_eq!(document.attr(policy, IP_ADDRESS), Some("10.0.0.7"));
        assert_eq!(document.attr(policy, USER_NAME), Some("alice"));
        let stamp = document.attr(policy, TIME_STAMP).ok_or("missing TimeStamp")?;
        NaiveDateTime::parse_from_str(stamp, PAYLOAD_TIMESTAMP_FORMAT)
            .map_err(|err| AppError::from(err.to_string()))?;

        let xml = document.to_xml();
        assert!(xml.starts_with("<root><policydata><attribute name=\"TimeStamp\" value=\""));
        assert!(xml.ends_with(
            "<attribute name=\"IpAddress\" value=\"10.0.0.7\" />\
<attribute name=\"UserName\" value=\"alice\" /></policydata></root>"
        ));
        Ok(())
    }
}
