//! NGINX Plus API client core.
//!
//! # Data Flow
//! ```text
//! NginxClientBuilder (endpoint, version, timeout, transport)
//!     → version.rs (range check, optional check against the endpoint root)
//!     → NginxClient (immutable: endpoint, version, transport, options)
//!
//! Domain call:
//!     → request.rs (build {endpoint}/{version}/..., send, check status)
//!     → on unexpected status: envelope.rs (decode error body)
//!     → error.rs (NginxError)
//! ```
//!
//! # Design Decisions
//! - The client holds no domain state between calls
//! - Every round trip has its own timeout
//! - No retries; the first failure is returned to the caller

pub mod builder;
pub mod envelope;
pub mod error;
pub mod request;
pub mod version;

use std::time::Duration;

use url::Url;

use crate::config::{ServerDefaults, UpdateConfig};

pub use builder::NginxClientBuilder;
pub use envelope::{ApiError, ApiErrorResponse};
pub use error::{NginxError, NginxResult};

/// Default timeout for a single API round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the NGINX Plus REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct NginxClient {
    pub(crate) endpoint: Url,
    pub(crate) api_version: u32,
    pub(crate) http: reqwest::Client,
    pub(crate) timeout: Duration,
    pub(crate) update: UpdateConfig,
    pub(crate) defaults: ServerDefaults,
}

impl NginxClient {
    /// Start building a client for `endpoint` (e.g. "http://127.0.0.1:8080/api").
    pub fn builder(endpoint: impl Into<String>) -> NginxClientBuilder {
        NginxClientBuilder::new(endpoint)
    }

    /// Create a client with default options.
    pub async fn new(endpoint: impl Into<String>) -> NginxResult<Self> {
        Self::builder(endpoint).build().await
    }

    /// Create a client from a loaded configuration.
    pub async fn from_config(config: &crate::config::ClientConfig) -> NginxResult<Self> {
        NginxClientBuilder::from_config(config).build().await
    }

    /// Base endpoint URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// API version used for every domain call.
    pub fn api_version(&self) -> u32 {
        self.api_version
    }

    /// Per round trip timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Defaults used when comparing server parameters.
    pub fn server_defaults(&self) -> &ServerDefaults {
        &self.defaults
    }
}
