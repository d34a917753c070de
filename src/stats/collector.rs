//! Stats collection.
//!
//! `get_stats` asks the API which resources exist, then fetches every
//! section one after another. Sections that NGINX does not expose for the
//! current configuration or API version are left absent.

use serde::de::DeserializeOwned;

use crate::client::error::{NginxError, NginxResult};
use crate::client::NginxClient;
use crate::stats::types::*;

/// Envelope code NGINX answers with for a resource it does not have.
const PATH_NOT_FOUND: &str = "PathNotFound";

fn is_listed(endpoints: &[String], name: &str) -> bool {
    endpoints.iter().any(|e| e == name)
}

/// Map a `PathNotFound` answer to an absent section.
fn absent_if_not_found<T>(section: &str, result: NginxResult<T>) -> NginxResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_path_not_found(&e) => {
            tracing::warn!(section = %section, "Stats section not found, leaving it absent");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

impl NginxClient {
    async fn get_section<T: DeserializeOwned>(&self, segments: &[&str], name: &str) -> NginxResult<T> {
        self.get_json(segments, &format!("failed to get {name}")).await
    }

    /// Resources listed at the versioned API root (`/{version}/`).
    pub async fn get_available_endpoints(&self) -> NginxResult<Vec<String>> {
        self.get_section(&[""], "available endpoints").await
    }

    /// Resources listed under `/{version}/stream/`.
    pub async fn get_available_stream_endpoints(&self) -> NginxResult<Vec<String>> {
        self.get_section(&["stream", ""], "available stream endpoints").await
    }

    pub async fn get_nginx_info(&self) -> NginxResult<NginxInfo> {
        self.get_section(&["nginx"], "info").await
    }

    pub async fn get_processes(&self) -> NginxResult<Processes> {
        self.get_section(&["processes"], "processes").await
    }

    pub async fn get_connections(&self) -> NginxResult<Connections> {
        self.get_section(&["connections"], "connections").await
    }

    pub async fn get_slabs(&self) -> NginxResult<Slabs> {
        self.get_section(&["slabs"], "slabs").await
    }

    pub async fn get_caches(&self) -> NginxResult<Caches> {
        self.get_section(&["http", "caches"], "caches").await
    }

    pub async fn get_http_requests(&self) -> NginxResult<HttpRequests> {
        self.get_section(&["http", "requests"], "http requests").await
    }

    pub async fn get_ssl(&self) -> NginxResult<Ssl> {
        self.get_section(&["ssl"], "ssl").await
    }

    pub async fn get_server_zones(&self) -> NginxResult<ServerZones> {
        self.get_section(&["http", "server_zones"], "server zones").await
    }

    pub async fn get_location_zones(&self) -> NginxResult<LocationZones> {
        self.get_section(&["http", "location_zones"], "location zones").await
    }

    pub async fn get_upstreams(&self) -> NginxResult<Upstreams> {
        self.get_section(&["http", "upstreams"], "upstreams").await
    }

    pub async fn get_http_limit_reqs(&self) -> NginxResult<HttpLimitRequests> {
        self.get_section(&["http", "limit_reqs"], "http limit requests").await
    }

    pub async fn get_http_limit_conns(&self) -> NginxResult<HttpLimitConnections> {
        self.get_section(&["http", "limit_conns"], "http limit connections").await
    }

    pub async fn get_resolvers(&self) -> NginxResult<Resolvers> {
        self.get_section(&["resolvers"], "resolvers").await
    }

    pub async fn get_workers(&self) -> NginxResult<Vec<Workers>> {
        self.get_section(&["workers"], "workers").await
    }

    pub async fn get_stream_server_zones(&self) -> NginxResult<StreamServerZones> {
        self.get_section(&["stream", "server_zones"], "stream server zones").await
    }

    pub async fn get_stream_upstreams(&self) -> NginxResult<StreamUpstreams> {
        self.get_section(&["stream", "upstreams"], "stream upstreams").await
    }

    pub async fn get_stream_limit_conns(&self) -> NginxResult<StreamLimitConnections> {
        self.get_section(&["stream", "limit_conns"], "stream limit connections").await
    }

    pub async fn get_stream_zone_sync(&self) -> NginxResult<StreamZoneSync> {
        self.get_section(&["stream", "zone_sync"], "stream zone sync").await
    }

    /// Fetch the whole stats document.
    ///
    /// Sections the API does not list are absent. A listed optional section
    /// answering 404 `PathNotFound` is absent too, and so is the whole stream
    /// block when its listing does. Any other failure fails the whole call.
    pub async fn get_stats(&self) -> NginxResult<Stats> {
        let endpoints = self.get_available_endpoints().await?;

        let stream_endpoints = if is_listed(&endpoints, "stream") {
            absent_if_not_found("stream", self.get_available_stream_endpoints().await)?
                .unwrap_or_default()
        } else {
            tracing::debug!("No stream block configured, skipping stream stats");
            Vec::new()
        };

        let mut stats = Stats {
            nginx_info: self.get_nginx_info().await?,
            processes: self.get_processes().await?,
            connections: self.get_connections().await?,
            slabs: self.get_slabs().await?,
            http_requests: self.get_http_requests().await?,
            server_zones: self.get_server_zones().await?,
            upstreams: self.get_upstreams().await?,
            caches: self.get_caches().await?,
            ..Stats::default()
        };

        if is_listed(&endpoints, "ssl") {
            stats.ssl = absent_if_not_found("ssl", self.get_ssl().await)?;
        }

        stats.location_zones =
            absent_if_not_found("location_zones", self.get_location_zones().await)?
                .unwrap_or_default();
        stats.http_limit_requests =
            absent_if_not_found("limit_reqs", self.get_http_limit_reqs().await)?
                .unwrap_or_default();
        stats.http_limit_connections =
            absent_if_not_found("limit_conns", self.get_http_limit_conns().await)?
                .unwrap_or_default();
        stats.resolvers =
            absent_if_not_found("resolvers", self.get_resolvers().await)?.unwrap_or_default();

        if is_listed(&endpoints, "workers") {
            stats.workers =
                absent_if_not_found("workers", self.get_workers().await)?.unwrap_or_default();
        }

        if is_listed(&stream_endpoints, "server_zones") {
            stats.stream_server_zones = absent_if_not_found(
                "stream/server_zones",
                self.get_stream_server_zones().await,
            )?
            .unwrap_or_default();
        }
        if is_listed(&stream_endpoints, "upstreams") {
            stats.stream_upstreams =
                absent_if_not_found("stream/upstreams", self.get_stream_upstreams().await)?
                    .unwrap_or_default();
        }
        if is_listed(&stream_endpoints, "limit_conns") {
            stats.stream_limit_connections =
                absent_if_not_found("stream/limit_conns", self.get_stream_limit_conns().await)?
                    .unwrap_or_default();
        }
        if is_listed(&stream_endpoints, "zone_sync") {
            stats.stream_zone_sync =
                absent_if_not_found("stream/zone_sync", self.get_stream_zone_sync().await)?;
        }

        Ok(stats)
    }
}

/// True if `err` is NGINX reporting a resource it does not have.
pub fn is_path_not_found(err: &NginxError) -> bool {
    err.status() == Some(404) && err.api_code() == Some(PATH_NOT_FOUND)
}
