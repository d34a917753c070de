//! Error envelope returned by the NGINX Plus API.
//!
//! # Responsibilities
//! - Model the JSON error body the API attaches to every non-success response
//! - Turn an unexpected response into a structured [`NginxError`]
//!
//! # Design Decisions
//! - This is the only place that interprets the wire error contract
//! - A body that cannot be decoded never hides the status mismatch; both
//!   failures end up in the returned error

use std::fmt;

use reqwest::{Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::client::error::NginxError;

/// Structured error body of the NGINX Plus API.
///
/// ```json
/// {
///   "error": {"status": 404, "text": "upstream not found", "code": "UpstreamNotFound"},
///   "request_id": "6b2b1c...",
///   "href": "https://nginx.org/en/docs/http/ngx_http_api_module.html"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorResponse {
    /// Request path echoed by the server (older API versions only).
    pub path: String,
    /// Request method echoed by the server (older API versions only).
    pub method: String,
    pub error: ApiError,
    pub request_id: String,
    /// Link to the API documentation.
    pub href: String,
}

/// Inner error object of [`ApiErrorResponse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub status: u16,
    pub text: String,
    pub code: String,
}

impl fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "path={}; method={}; error.status={}; error.text={}; error.code={}; request_id={}; href={}",
            self.path,
            self.method,
            self.error.status,
            self.error.text,
            self.error.code,
            self.request_id,
            self.href
        )
    }
}

/// Decode an error envelope from a raw body.
pub fn decode_error_body(body: &str) -> Result<ApiErrorResponse, String> {
    // An object is required; `null`, arrays and scalars are not an envelope.
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| format!("error unmarshalling error response: got {body:?} response: {e}"))?;
    if !value.is_object() {
        return Err(format!(
            "error unmarshalling error response: got {body:?} response: expected a JSON object"
        ));
    }
    serde_json::from_value(value)
        .map_err(|e| format!("error unmarshalling error response: got {body:?} response: {e}"))
}

/// Build the error for a response whose status was not `expected`.
///
/// Consumes the response to read its body.
pub async fn response_mismatch(
    context: impl Into<String>,
    expected: StatusCode,
    response: Response,
) -> NginxError {
    let context = context.into();
    let actual = response.status().as_u16();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return NginxError::UndecodableResponse {
                context,
                expected: expected.as_u16(),
                actual,
                reason: format!("failed to read the response body: {e}"),
            }
        }
    };

    mismatch_from_body(context, expected, actual, &body)
}

/// Same as [`response_mismatch`] for an already read body.
pub fn mismatch_from_body(
    context: String,
    expected: StatusCode,
    actual: u16,
    body: &str,
) -> NginxError {
    match decode_error_body(body) {
        Ok(response) => NginxError::Api {
            context,
            expected: expected.as_u16(),
            actual,
            response,
        },
        Err(reason) => NginxError::UndecodableResponse {
            context,
            expected: expected.as_u16(),
            actual,
            reason,
        },
    }
}
