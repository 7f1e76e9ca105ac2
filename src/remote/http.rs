use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::trace;
use url::Url;

use crate::error::RemoteError;

use super::{RemoteFactory, RemoteService};

const USER_AGENT: &str = concat!("barrage/", env!("CARGO_PKG_VERSION"));
const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";
const AGENT_QUERY: &str = "agent";

/// Remote operation a workload drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ReportEvents,
    ReportHealth,
    FetchPolicyData { agent: String },
}

impl Operation {
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Operation::ReportEvents => "events",
            Operation::ReportHealth => "health",
            Operation::FetchPolicyData { .. } => "policy-data",
        }
    }

    /// Full request URL below `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::OperationUrl` when the URL cannot be joined.
    pub fn url(&self, endpoint: &Url) -> Result<Url, RemoteError> {
        let mut base = endpoint.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let mut url = base
            .join(self.path())
            .map_err(|err| RemoteError::OperationUrl {
                path: self.path().to_owned(),
                source: err,
            })?;
        if let Operation::FetchPolicyData { agent } = self {
            url.query_pairs_mut().append_pair(AGENT_QUERY, agent);
        }
        Ok(url)
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub endpoint: Url,
    pub request_timeout: Duration,
}

/// `POST`s XML payloads to one operation URL.
#[derive(Debug)]
pub struct HttpService {
    client: Client,
    url: Url,
}

impl HttpService {
    /// # Errors
    ///
    /// Returns an error when the client cannot be built or the operation URL
    /// is invalid.
    pub fn new(settings: &HttpSettings, operation: &Operation) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| RemoteError::BuildClient { source: err })?;
        let url = operation.url(&settings.endpoint)?;
        Ok(Self { client, url })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RemoteService for HttpService {
    async fn send(&self, payload: &str) -> Result<String, RemoteError> {
        trace!("POST {} ({} bytes)", self.url, payload.len());
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(payload.to_owned())
            .send()
            .await
            .map_err(|err| RemoteError::Transport { source: err })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .text()
            .await
            .map_err(|err| RemoteError::ReadBody { source: err })
    }
}

/// Builds a fresh [`HttpService`] (and client) for every worker.
#[derive(Debug, Clone)]
pub struct HttpServiceFactory {
    settings: HttpSettings,
    operation: Operation,
}

impl HttpServiceFactory {
    #[must_use]
    pub const fn new(settings: HttpSettings, operation: Operation) -> Self {
        Self {
            settings,
            operation,
        }
    }
}

impl RemoteFactory for HttpServiceFactory {
    fn create(&self, partition: &str) -> Result<Box<dyn RemoteService>, RemoteError> {
        let service = HttpService::new(&self.settings, &self.operation)?;
        trace!("Worker '{}' targets {}", partition, service.url());
        Ok(Box::new(service))
    }
}
