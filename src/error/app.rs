use thiserror::Error;

use super::{
    ConfigError, HarnessError, PayloadError, RecordError, RemoteError, SinkError, ValidationError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("TOML error: {source}")]
    Toml {
        #[from]
        source: toml::de::Error,
    },
    #[error("HTTP client error: {source}")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },
    #[error("Join error: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
    #[error("Harness error: {0}")]
    Harness(#[from] HarnessError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation<E>(error: E) -> Self
    where
        E: Into<ValidationError>,
    {
        error.into().into()
    }

    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn payload<E>(error: E) -> Self
    where
        E: Into<PayloadError>,
    {
        error.into().into()
    }

    pub fn record<E>(error: E) -> Self
    where
        E: Into<RecordError>,
    {
        error.into().into()
    }

    pub fn remote<E>(error: E) -> Self
    where
        E: Into<RemoteError>,
    {
        error.into().into()
    }

    pub fn sink<E>(error: E) -> Self
    where
        E: Into<SinkError>,
    {
        error.into().into()
    }

    pub fn harness<E>(error: E) -> Self
    where
        E: Into<HarnessError>,
    {
        error.into().into()
    }
}
