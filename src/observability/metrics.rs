//! Metrics collection.
//!
//! # Responsibilities
//! - Count API round trips and their latency
//! - Count changes applied by upstream reconciliation
//!
//! # Metrics
//! - `nginx_plus_api_requests_total` (counter): round trips by method, status
//! - `nginx_plus_api_request_duration_seconds` (histogram): latency by method
//! - `nginx_plus_reconcile_changes_total` (counter): applied changes by kind, action
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no-ops until the embedding
//!   application installs a recorder
//! - Status label is "error" when no response was received
//! - No per-upstream labels to keep cardinality bounded

use std::time::Instant;

use reqwest::Method;

/// Record a single API round trip.
pub fn record_api_request(method: &Method, status: Option<u16>, start: Instant) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());

    metrics::counter!(
        "nginx_plus_api_requests_total",
        "method" => method.as_str().to_string(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "nginx_plus_api_request_duration_seconds",
        "method" => method.as_str().to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record changes applied to an upstream group.
pub fn record_reconcile_changes(kind: &'static str, action: &'static str, count: usize) {
    if count == 0 {
        return;
    }
    metrics::counter!(
        "nginx_plus_reconcile_changes_total",
        "kind" => kind,
        "action" => action
    )
    .increment(count as u64);
}
