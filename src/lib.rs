//! NGINX Plus API client library.
//!
//! Manages upstream servers, key-value zones and statistics of an NGINX Plus
//! instance through its REST API (`{endpoint}/{version}/...`).
//!
//! ```no_run
//! # async fn run() -> nginx_plus_client::NginxResult<()> {
//! use nginx_plus_client::{NginxClient, UpstreamServer};
//!
//! let client = NginxClient::new("http://127.0.0.1:8080/api").await?;
//! let changes = client
//!     .update_http_servers("backend", &[UpstreamServer::new("10.0.0.1")])
//!     .await?;
//! println!("added {}", changes.added.len());
//! # Ok(())
//! # }
//! ```

// Core
pub mod client;
pub mod config;

// Resources
pub mod keyval;
pub mod stats;
pub mod upstream;

// Cross-cutting concerns
pub mod observability;

pub use client::{ApiError, ApiErrorResponse, NginxClient, NginxClientBuilder, NginxError, NginxResult};
pub use config::{load_config, ClientConfig, ServerDefaults, UpdateStrategy};
pub use keyval::{KeyValPairs, KeyValPairsByZone};
pub use stats::Stats;
pub use upstream::{
    add_port_to_server, ServerChanges, StreamUpstreamServer, UpstreamKind, UpstreamPeer,
    UpstreamServer,
};
