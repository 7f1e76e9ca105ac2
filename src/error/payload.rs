use thiserror::Error;

use super::RecordError;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("Invalid path expression '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
    #[error("Path '{path}' does not select any node.")]
    PathNotFound { path: String },
    #[error("Path '{path}' selects {count} nodes; expected exactly one.")]
    AmbiguousPath { path: String, count: usize },
    #[error("No node carries an attribute named '{name}'.")]
    AttributeNotFound { name: String },
    #[error("Node {id} is not part of the document.")]
    DetachedNode { id: usize },
    #[error("Cannot remove the document root.")]
    RemoveRoot,
    #[error("Invalid payload template: {reason}")]
    InvalidTemplate { reason: String },
    #[error("Failed to parse payload template: {source}")]
    ParseTemplate {
        #[source]
        source: quick_xml::Error,
    },
    #[error("Field '{field}' is missing from record {sequence}.")]
    MissingField { field: String, sequence: u64 },
    #[error("{0}")]
    Record(#[from] RecordError),
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
