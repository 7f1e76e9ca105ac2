mod app;
mod config;
mod harness;
mod payload;
mod record;
mod remote;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use harness::HarnessError;
pub use payload::PayloadError;
pub use record::RecordError;
pub use remote::RemoteError;
pub use sink::SinkError;
pub use validation::ValidationError;
