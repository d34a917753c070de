//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::client::version::DEFAULT_API_VERSION;

/// Root configuration for an NGINX Plus API client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://127.0.0.1:8080/api").
    pub endpoint: String,

    /// API version to use. `None` selects the newest version the client supports.
    pub api_version: Option<u32>,

    /// Require the server to advertise `api_version` when the client is built.
    pub check_api: bool,

    /// Timeout for a single API round trip, in seconds.
    pub timeout_secs: u64,

    /// How changed upstream servers are applied.
    pub update: UpdateConfig,

    /// Documented NGINX defaults for optional server parameters.
    pub defaults: ServerDefaults,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080/api".to_string(),
            api_version: None,
            check_api: false,
            timeout_secs: 10,
            update: UpdateConfig::default(),
            defaults: ServerDefaults::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// API version this configuration resolves to.
    pub fn effective_api_version(&self) -> u32 {
        self.api_version.unwrap_or(DEFAULT_API_VERSION)
    }
}

/// Strategy for applying a parameter change to an existing upstream server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateStrategy {
    /// PATCH the server in place, keeping its id.
    #[default]
    Patch,
    /// DELETE the server, then POST it again with the new parameters.
    Replace,
}

/// Update strategy per upstream kind.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct UpdateConfig {
    pub http: UpdateStrategy,
    pub stream: UpdateStrategy,
}

/// Values NGINX assumes for server parameters that were never set.
///
/// Used when comparing a desired server against the one NGINX reports:
/// a parameter left unset on the desired side is compared as this default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerDefaults {
    pub max_conns: u32,
    pub max_fails: u32,
    pub fail_timeout: String,
    pub slow_start: String,
    pub backup: bool,
    pub down: bool,
    pub weight: u32,
}

impl Default for ServerDefaults {
    fn default() -> Self {
        Self {
            max_conns: 0,
            max_fails: 1,
            fail_timeout: "10s".to_string(),
            slow_start: "0s".to_string(),
            backup: false,
            down: false,
            weight: 1,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
