//! Boundary to the service under load. Workers only see [`RemoteService`];
//! the HTTP binding is one implementation of it.
mod http;

use async_trait::async_trait;

use crate::error::RemoteError;

pub use http::{HttpServiceFactory, HttpSettings, HttpService, Operation};

#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Sends one payload and returns the service's textual response.
    async fn send(&self, payload: &str) -> Result<String, RemoteError>;
}

/// Creates the service instance owned by one worker.
pub trait RemoteFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the service cannot be constructed.
    fn create(&self, partition: &str) -> Result<Box<dyn RemoteService>, RemoteError>;
}
