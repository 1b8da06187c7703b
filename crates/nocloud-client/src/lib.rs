//! HTTP client for the NoCloud storage API.
//!
//! Uploads go through a signed URL: the client inspects the body, asks the
//! control plane for a URL sized and typed for it, then PUTs the bytes straight
//! to the object store. Deletes are sent to the control plane, in batches for
//! large id collections.
//!
//! ```no_run
//! # async fn run() -> nocloud_core::NoCloudResult<()> {
//! use nocloud_client::{Blob, NoCloudClient};
//!
//! let client = NoCloudClient::from_env()?;
//! let uploaded = client
//!     .upload(Blob::new("Hello, NoCloud!", "text/plain"), None)
//!     .await?;
//! client.delete(uploaded.id.as_str()).await?;
//! # Ok(())
//! # }
//! ```

pub mod delete;
pub mod resolver;
pub mod signed_url;
pub mod transport;
pub mod upload;

use nocloud_core::{ClientConfig, NoCloudResult};

pub use resolver::ResponseResolver;
pub use transport::{Transport, TransportRequest};

// Re-export the domain types callers need alongside the client.
pub use nocloud_core::{
    Blob, ErrorCode, ErrorMetadata, FileBody, FileMetadata, IntoFileBody, MediaIds, MetadataValue,
    NoCloudError, RetryPolicy, SignedUrlResponse, UploadResponse,
};

/// Client for the NoCloud storage API.
///
/// Cheap to clone; clones share the HTTP connection pool and configuration.
#[derive(Clone, Debug)]
pub struct NoCloudClient {
    transport: Transport,
    resolver: ResponseResolver,
}

impl NoCloudClient {
    pub fn new(config: ClientConfig) -> NoCloudResult<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            resolver: ResponseResolver::new(),
        })
    }

    /// Create client from environment, see `ClientConfig::from_env`.
    pub fn from_env() -> NoCloudResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn with_resolver(mut self, resolver: ResponseResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        self.transport.config()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }
}
