//! API version negotiation.
//!
//! # Responsibilities
//! - Define the API versions this client speaks
//! - Fetch the versions advertised at the endpoint root
//! - Validate a requested version against both sets
//!
//! # Design Decisions
//! - Range checks happen at build time, before any domain call
//! - The endpoint root is not a domain resource: any failure reaching it is
//!   reported as `EndpointUnreachable`, not as an API error

use std::time::{Duration, Instant};

use reqwest::{Method, StatusCode};
use url::Url;

use crate::client::error::{NginxError, NginxResult};
use crate::client::NginxClient;
use crate::observability::metrics;

/// Oldest API version supported by this client.
pub const MIN_API_VERSION: u32 = 4;

/// Newest API version supported by this client.
pub const MAX_API_VERSION: u32 = 9;

/// Version used when none is configured.
pub const DEFAULT_API_VERSION: u32 = MAX_API_VERSION;

/// Return true if the client can speak `version`.
pub fn is_supported(version: u32) -> bool {
    (MIN_API_VERSION..=MAX_API_VERSION).contains(&version)
}

/// Reject versions outside the client's range.
pub fn validate_version(version: u32) -> NginxResult<()> {
    if is_supported(version) {
        return Ok(());
    }
    Err(NginxError::UnsupportedVersion {
        version,
        reason: format!(
            "the client supports versions {MIN_API_VERSION}..={MAX_API_VERSION}"
        ),
    })
}

/// Require `version` to be advertised by the server.
pub fn check_advertised(version: u32, advertised: &[u32]) -> NginxResult<()> {
    if advertised.contains(&version) {
        return Ok(());
    }
    Err(NginxError::UnsupportedVersion {
        version,
        reason: format!("not supported by API versions of NGINX Plus: {advertised:?}"),
    })
}

/// Highest version both the server and the client support.
pub fn max_common_version(advertised: &[u32]) -> NginxResult<u32> {
    advertised
        .iter()
        .copied()
        .filter(|v| is_supported(*v))
        .max()
        .ok_or_else(|| NginxError::UnsupportedVersion {
            version: advertised.iter().copied().max().unwrap_or_default(),
            reason: format!(
                "no overlap between server versions {advertised:?} and client versions {MIN_API_VERSION}..={MAX_API_VERSION}"
            ),
        })
}

/// GET the endpoint root and decode the advertised version list.
pub(crate) async fn fetch_api_versions(
    http: &reqwest::Client,
    endpoint: &Url,
    timeout: Duration,
) -> NginxResult<Vec<u32>> {
    let start = Instant::now();
    let unreachable = |reason: String| NginxError::EndpointUnreachable {
        endpoint: endpoint.to_string(),
        reason,
    };

    let response = match http.get(endpoint.clone()).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            metrics::record_api_request(&Method::GET, None, start);
            return Err(unreachable(e.to_string()));
        }
    };

    let status = response.status();
    metrics::record_api_request(&Method::GET, Some(status.as_u16()), start);

    if status != StatusCode::OK {
        return Err(unreachable(format!(
            "expected {} response, got {}",
            StatusCode::OK.as_u16(),
            status.as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| unreachable(format!("error while reading body of the response: {e}")))?;

    serde_json::from_str(&body).map_err(|source| NginxError::Decode {
        context: "error unmarshalling versions".to_string(),
        body,
        source,
    })
}

impl NginxClient {
    /// API versions advertised by the server.
    pub async fn get_api_versions(&self) -> NginxResult<Vec<u32>> {
        fetch_api_versions(&self.http, &self.endpoint, self.timeout).await
    }

    /// Highest API version supported by both the server and this client.
    pub async fn get_max_api_version(&self) -> NginxResult<u32> {
        let advertised = self.get_api_versions().await?;
        max_common_version(&advertised)
    }
}
