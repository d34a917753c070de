//! Error definitions for the NGINX Plus client.

use thiserror::Error;

use crate::client::envelope::ApiErrorResponse;

/// Errors returned by every client operation.
#[derive(Debug, Error)]
pub enum NginxError {
    /// The API root could not be reached or answered with a non-200 status.
    #[error("{endpoint} is not accessible: {reason}")]
    EndpointUnreachable { endpoint: String, reason: String },

    /// API version outside the supported range or not advertised by the server.
    #[error("API version {version} is not supported: {reason}")]
    UnsupportedVersion { version: u32, reason: String },

    /// A response body did not match the expected JSON shape.
    #[error("{context}: got {body:?} response: {source}")]
    Decode {
        context: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered with an unexpected status and a structured error body.
    #[error("{context}: expected {expected} response, got {actual}; error: {response}")]
    Api {
        context: String,
        expected: u16,
        actual: u16,
        response: ApiErrorResponse,
    },

    /// Unexpected status and the error body itself could not be decoded.
    #[error("{context}: expected {expected} response, got {actual}; {reason}")]
    UndecodableResponse {
        context: String,
        expected: u16,
        actual: u16,
        reason: String,
    },

    /// Request could not be sent or the response could not be read.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to add {server} server to {upstream} upstream: server already exists")]
    AlreadyExists { upstream: String, server: String },

    #[error("failed to remove {server} server from {upstream} upstream: server doesn't exist")]
    NotFound { upstream: String, server: String },

    /// An in-place update needs the server-assigned id.
    #[error("failed to update {server} server of {upstream} upstream: server has no id")]
    MissingId { upstream: String, server: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NginxError {
    /// Server-reported error code, if the error carries an envelope.
    pub fn api_code(&self) -> Option<&str> {
        match self {
            NginxError::Api { response, .. } => Some(response.error.code.as_str()),
            _ => None,
        }
    }

    /// HTTP status received, for status mismatch errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            NginxError::Api { actual, .. } | NginxError::UndecodableResponse { actual, .. } => {
                Some(*actual)
            }
            _ => None,
        }
    }
}

/// Result type for client operations.
pub type NginxResult<T> = Result<T, NginxError>;
