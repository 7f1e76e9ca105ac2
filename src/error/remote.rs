use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid operation URL '{path}': {source}")]
    OperationUrl {
        path: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("Service responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Unavailable { message: String },
}
