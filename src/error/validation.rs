use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid boolean '{value}'.")]
    InvalidBoolean { value: String },
    #[error("Batch size must be at least 1.")]
    BatchSizeZero,
    #[error("Iterations count must be at least 1.")]
    IterationsZero,
    #[error("At least one partition is required.")]
    NoPartitions,
    #[error("The file {path} does not exist.")]
    InputFileMissing { path: PathBuf },
    #[error("Failed to read input list '{path}': {source}")]
    ReadInputList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input list '{path}' does not name any event files.")]
    InputListEmpty { path: PathBuf },
    #[error("Test number {number} does not exist.")]
    UnknownTestNumber { number: u32 },
    #[error("Missing endpoint (set --endpoint or provide in config).")]
    MissingEndpoint,
    #[error("Invalid endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Endpoint '{url}' cannot be used as a base URL.")]
    EndpointNotBase { url: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
