//! Request plumbing shared by every resource accessor.
//!
//! # Responsibilities
//! - Build versioned URLs (`{endpoint}/{version}/{segments}`)
//! - Send requests with the per round trip timeout
//! - Enforce the expected status and decode JSON bodies
//! - Route unexpected responses through the envelope decoder

use std::time::Instant;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::client::envelope::response_mismatch;
use crate::client::error::{NginxError, NginxResult};
use crate::client::NginxClient;
use crate::observability::metrics;

impl NginxClient {
    /// URL of a versioned API resource.
    ///
    /// Segments are percent-encoded. A trailing empty segment produces a
    /// trailing slash (`/9/` lists the root resources).
    pub(crate) fn api_url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .push(&self.api_version.to_string())
                .extend(segments);
        }
        url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        context: &str,
    ) -> NginxResult<Response> {
        let url = self.api_url(segments);
        let start = Instant::now();

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                metrics::record_api_request(&method, Some(status.as_u16()), start);
                tracing::debug!(
                    method = %method,
                    url = %url,
                    status = status.as_u16(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "NGINX Plus API call"
                );
                Ok(response)
            }
            Err(source) => {
                metrics::record_api_request(&method, None, start);
                tracing::debug!(method = %method, url = %url, error = %source, "NGINX Plus API call failed");
                Err(NginxError::Transport {
                    context: context.to_string(),
                    source,
                })
            }
        }
    }

    /// Send and require `expected`, decoding the error envelope otherwise.
    async fn send_expecting<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        expected: StatusCode,
        context: &str,
    ) -> NginxResult<Response> {
        let response = self.send(method, segments, body, context).await?;
        if response.status() != expected {
            return Err(response_mismatch(context, expected, response).await);
        }
        Ok(response)
    }

    /// GET a resource, expecting 200 and a JSON body of type `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        context: &str,
    ) -> NginxResult<T> {
        let response = self
            .send_expecting::<()>(Method::GET, segments, None, StatusCode::OK, context)
            .await?;

        let body = response.text().await.map_err(|source| NginxError::Transport {
            context: format!("{context}: failed to read the response body"),
            source,
        })?;

        serde_json::from_str(&body).map_err(|source| NginxError::Decode {
            context: context.to_string(),
            body,
            source,
        })
    }

    /// POST a JSON body.
    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        expected: StatusCode,
        context: &str,
    ) -> NginxResult<()> {
        self.send_expecting(Method::POST, segments, Some(body), expected, context)
            .await
            .map(drop)
    }

    /// PATCH a JSON body.
    pub(crate) async fn patch_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        expected: StatusCode,
        context: &str,
    ) -> NginxResult<()> {
        self.send_expecting(Method::PATCH, segments, Some(body), expected, context)
            .await
            .map(drop)
    }

    /// DELETE a resource.
    pub(crate) async fn delete(
        &self,
        segments: &[&str],
        expected: StatusCode,
        context: &str,
    ) -> NginxResult<()> {
        self.send_expecting::<()>(Method::DELETE, segments, None, expected, context)
            .await
            .map(drop)
    }
}
