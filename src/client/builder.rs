//! Client construction and option handling.

use std::time::Duration;

use crate::client::error::{NginxError, NginxResult};
use crate::client::version::{
    check_advertised, fetch_api_versions, validate_version, DEFAULT_API_VERSION,
};
use crate::client::{NginxClient, DEFAULT_TIMEOUT};
use crate::config::validation::validate_endpoint;
use crate::config::{ClientConfig, ServerDefaults, UpdateConfig, UpdateStrategy};
use crate::upstream::UpstreamKind;

/// Builder for [`NginxClient`].
#[derive(Debug, Clone)]
pub struct NginxClientBuilder {
    endpoint: String,
    api_version: Option<u32>,
    check_api: bool,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    update: UpdateConfig,
    defaults: ServerDefaults,
}

impl NginxClientBuilder {
    /// Create a builder with default options.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_version: None,
            check_api: false,
            http_client: None,
            timeout: None,
            update: UpdateConfig::default(),
            defaults: ServerDefaults::default(),
        }
    }

    /// Create a builder carrying every option of a configuration.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_version: config.api_version,
            check_api: config.check_api,
            http_client: None,
            timeout: Some(Duration::from_secs(config.timeout_secs)),
            update: config.update.clone(),
            defaults: config.defaults.clone(),
        }
    }

    /// Use a specific API version instead of the newest supported one.
    pub fn api_version(mut self, version: u32) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Verify at build time that the server advertises the API version.
    pub fn check_api(mut self, check: bool) -> Self {
        self.check_api = check;
        self
    }

    /// Use a preconfigured transport (TLS, proxies, auth headers).
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Timeout for each round trip. Must be greater than zero.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// How changed servers of the given kind are applied.
    pub fn update_strategy(mut self, kind: UpstreamKind, strategy: UpdateStrategy) -> Self {
        match kind {
            UpstreamKind::Http => self.update.http = strategy,
            UpstreamKind::Stream => self.update.stream = strategy,
        }
        self
    }

    /// Defaults used when comparing server parameters.
    pub fn server_defaults(mut self, defaults: ServerDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Validate options and build the client.
    ///
    /// With `check_api` set this performs one GET against the endpoint root.
    pub async fn build(self) -> NginxResult<NginxClient> {
        let endpoint = validate_endpoint(&self.endpoint).map_err(NginxError::InvalidConfig)?;

        let api_version = self.api_version.unwrap_or(DEFAULT_API_VERSION);
        validate_version(api_version)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(NginxError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let http = match self.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|source| {
                NginxError::Transport {
                    context: "failed to create the HTTP client".to_string(),
                    source,
                }
            })?,
        };

        if self.check_api {
            let advertised = fetch_api_versions(&http, &endpoint, timeout).await?;
            check_advertised(api_version, &advertised)?;
            tracing::debug!(
                api_version,
                advertised = ?advertised,
                "API version advertised by NGINX Plus"
            );
        }

        tracing::info!(
            endpoint = %endpoint,
            api_version,
            timeout_ms = timeout.as_millis() as u64,
            "NGINX Plus client initialized"
        );

        Ok(NginxClient {
            endpoint,
            api_version,
            http,
            timeout,
            update: self.update,
            defaults: self.defaults,
        })
    }
}
