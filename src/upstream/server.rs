//! Upstream server types.
//!
//! # Responsibilities
//! - Model HTTP and stream upstream servers as the API serializes them
//! - Expose both through one capability trait so diffing is written once

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Which API subtree an upstream lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamKind {
    Http,
    Stream,
}

impl UpstreamKind {
    /// First path segment of the kind's resources.
    pub fn path_prefix(self) -> &'static str {
        match self {
            UpstreamKind::Http => "http",
            UpstreamKind::Stream => "stream",
        }
    }
}

impl fmt::Display for UpstreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_prefix())
    }
}

/// A server of an HTTP upstream group.
///
/// Every tunable is optional: `None` leaves the value to NGINX.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamServer {
    /// Assigned by NGINX; never sent in a request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_conns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fails: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drain: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl UpstreamServer {
    /// Server with only an address set.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }
}

/// A server of a stream (TCP/UDP) upstream group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUpstreamServer {
    /// Assigned by NGINX; never sent in a request body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub server: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_conns: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fails: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slow_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

impl StreamUpstreamServer {
    /// Server with only an address set.
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Default::default()
        }
    }
}

/// Borrowed view of every comparable parameter of a server.
///
/// Fields a kind does not have are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerParameters<'a> {
    pub max_conns: Option<u32>,
    pub max_fails: Option<u32>,
    pub fail_timeout: Option<&'a str>,
    pub slow_start: Option<&'a str>,
    pub route: Option<&'a str>,
    pub backup: Option<bool>,
    pub down: Option<bool>,
    pub drain: Option<bool>,
    pub weight: Option<u32>,
    pub service: Option<&'a str>,
}

/// Capabilities the generic accessors and the reconciliation need from a
/// server type.
pub trait UpstreamPeer:
    Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// API subtree the type belongs to.
    const KIND: UpstreamKind;

    /// Port appended to portless addresses before diffing. `None` leaves
    /// addresses untouched.
    const DEFAULT_PORT: Option<u16>;

    /// Address, the identity of the server within its group.
    fn address(&self) -> &str;

    fn set_address(&mut self, address: String);

    /// Server-assigned id.
    fn identity(&self) -> Option<u64>;

    /// Same server with a different id.
    fn with_id(self, id: Option<u64>) -> Self;

    fn parameters(&self) -> ServerParameters<'_>;
}

impl UpstreamPeer for UpstreamServer {
    const KIND: UpstreamKind = UpstreamKind::Http;
    const DEFAULT_PORT: Option<u16> = Some(80);

    fn address(&self) -> &str {
        &self.server
    }

    fn set_address(&mut self, address: String) {
        self.server = address;
    }

    fn identity(&self) -> Option<u64> {
        self.id
    }

    fn with_id(mut self, id: Option<u64>) -> Self {
        self.id = id;
        self
    }

    fn parameters(&self) -> ServerParameters<'_> {
        ServerParameters {
            max_conns: self.max_conns,
            max_fails: self.max_fails,
            fail_timeout: self.fail_timeout.as_deref(),
            slow_start: self.slow_start.as_deref(),
            route: self.route.as_deref(),
            backup: self.backup,
            down: self.down,
            drain: self.drain,
            weight: self.weight,
            service: self.service.as_deref(),
        }
    }
}

impl UpstreamPeer for StreamUpstreamServer {
    const KIND: UpstreamKind = UpstreamKind::Stream;
    // Stream servers always need an explicit port.
    const DEFAULT_PORT: Option<u16> = None;

    fn address(&self) -> &str {
        &self.server
    }

    fn set_address(&mut self, address: String) {
        self.server = address;
    }

    fn identity(&self) -> Option<u64> {
        self.id
    }

    fn with_id(mut self, id: Option<u64>) -> Self {
        self.id = id;
        self
    }

    fn parameters(&self) -> ServerParameters<'_> {
        ServerParameters {
            max_conns: self.max_conns,
            max_fails: self.max_fails,
            fail_timeout: self.fail_timeout.as_deref(),
            slow_start: self.slow_start.as_deref(),
            route: None,
            backup: self.backup,
            down: self.down,
            drain: None,
            weight: self.weight,
            service: self.service.as_deref(),
        }
    }
}
