//! Stats document types.
//!
//! Every struct decodes with missing fields defaulted, so older API versions
//! that report fewer counters still decode. Maps are keyed by zone, upstream
//! or resolver name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Composite snapshot assembled by [`get_stats`](crate::client::NginxClient::get_stats).
///
/// Sections that depend on NGINX configuration are absent rather than
/// failing: stream maps are empty and `stream_zone_sync` is `None` without a
/// `stream {}` block, `ssl` is `None` when the API does not list it and
/// `workers` is empty before API version 9.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub nginx_info: NginxInfo,
    pub processes: Processes,
    pub connections: Connections,
    pub slabs: Slabs,
    pub caches: Caches,
    pub http_requests: HttpRequests,
    pub ssl: Option<Ssl>,
    pub server_zones: ServerZones,
    pub location_zones: LocationZones,
    pub upstreams: Upstreams,
    pub http_limit_requests: HttpLimitRequests,
    pub http_limit_connections: HttpLimitConnections,
    pub resolvers: Resolvers,
    pub stream_server_zones: StreamServerZones,
    pub stream_upstreams: StreamUpstreams,
    pub stream_limit_connections: StreamLimitConnections,
    pub stream_zone_sync: Option<StreamZoneSync>,
    pub workers: Vec<Workers>,
}

/// General information about the NGINX instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NginxInfo {
    pub version: String,
    pub build: String,
    pub address: String,
    pub generation: u64,
    pub load_timestamp: String,
    pub timestamp: String,
    pub pid: u64,
    pub ppid: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Processes {
    pub respawned: u64,
}

/// Client connection counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Connections {
    pub accepted: u64,
    pub dropped: u64,
    pub active: u64,
    pub idle: u64,
}

pub type Slabs = BTreeMap<String, Slab>;

/// Shared memory zone usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slab {
    pub pages: Pages,
    /// Slot usage by slot size.
    pub slots: BTreeMap<String, Slot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pages {
    pub used: u64,
    pub free: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Slot {
    pub used: u64,
    pub free: u64,
    pub reqs: u64,
    pub fails: u64,
}

pub type Caches = BTreeMap<String, HttpCache>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpCache {
    pub size: u64,
    pub max_size: u64,
    /// True while the cache loader is still reading the cache from disk.
    pub cold: bool,
    pub hit: CacheStats,
    pub stale: CacheStats,
    pub updating: CacheStats,
    pub revalidated: CacheStats,
    pub miss: ExtendedCacheStats,
    pub expired: ExtendedCacheStats,
    pub bypass: ExtendedCacheStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheStats {
    pub responses: u64,
    pub bytes: u64,
}

/// Cache counters that also track responses written to the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtendedCacheStats {
    pub responses: u64,
    pub bytes: u64,
    pub responses_written: u64,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRequests {
    pub total: u64,
    pub current: u64,
}

/// TLS counters, reported globally, per server zone and per peer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ssl {
    pub handshakes: u64,
    pub handshakes_failed: u64,
    pub session_reuses: u64,
    pub no_common_protocol: u64,
    pub no_common_cipher: u64,
    pub handshake_timeout: u64,
    pub peer_rejected_cert: u64,
    pub verify_failures: VerifyFailures,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyFailures {
    pub no_cert: u64,
    pub expired_cert: u64,
    pub revoked_cert: u64,
    pub hostname_mismatch: u64,
    pub other: u64,
}

pub type ServerZones = BTreeMap<String, ServerZone>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerZone {
    pub processing: u64,
    pub requests: u64,
    pub responses: Responses,
    pub discarded: u64,
    pub received: u64,
    pub sent: u64,
    pub ssl: Ssl,
}

/// Response counters by status class. `codes` holds per-status counters
/// when the zone enables them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Responses {
    pub codes: BTreeMap<String, u64>,
    #[serde(rename = "1xx")]
    pub responses_1xx: u64,
    #[serde(rename = "2xx")]
    pub responses_2xx: u64,
    #[serde(rename = "3xx")]
    pub responses_3xx: u64,
    #[serde(rename = "4xx")]
    pub responses_4xx: u64,
    #[serde(rename = "5xx")]
    pub responses_5xx: u64,
    pub total: u64,
}

pub type Upstreams = BTreeMap<String, Upstream>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upstream {
    pub peers: Vec<Peer>,
    pub keepalive: u64,
    pub zombies: u64,
    pub zone: String,
    pub queue: Queue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    pub size: u64,
    pub max_size: u64,
    pub overflows: u64,
}

/// A server of an HTTP upstream as seen by the stats API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Peer {
    pub id: u64,
    pub server: String,
    pub service: String,
    pub name: String,
    pub backup: bool,
    pub weight: u64,
    /// "up", "draining", "down", "unavail", "checking" or "unhealthy".
    pub state: String,
    pub active: u64,
    pub ssl: Ssl,
    pub max_conns: u64,
    pub requests: u64,
    pub responses: Responses,
    pub sent: u64,
    pub received: u64,
    pub fails: u64,
    pub unavail: u64,
    pub health_checks: HealthChecks,
    pub downtime: u64,
    pub downstart: String,
    pub selected: String,
    pub header_time: u64,
    pub response_time: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthChecks {
    pub checks: u64,
    pub fails: u64,
    pub unhealthy: u64,
    pub last_passed: bool,
}

pub type LocationZones = BTreeMap<String, LocationZone>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationZone {
    pub requests: u64,
    pub responses: Responses,
    pub discarded: u64,
    pub received: u64,
    pub sent: u64,
}

pub type Resolvers = BTreeMap<String, Resolver>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resolver {
    pub requests: ResolverRequests,
    pub responses: ResolverResponses,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverRequests {
    pub name: u64,
    pub srv: u64,
    pub addr: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverResponses {
    pub noerror: u64,
    pub formerr: u64,
    pub servfail: u64,
    pub nxdomain: u64,
    pub notimp: u64,
    pub refused: u64,
    pub timedout: u64,
    pub unknown: u64,
}

pub type HttpLimitRequests = BTreeMap<String, HttpLimitRequest>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpLimitRequest {
    pub passed: u64,
    pub delayed: u64,
    pub rejected: u64,
    pub delayed_dry_run: u64,
    pub rejected_dry_run: u64,
}

pub type HttpLimitConnections = BTreeMap<String, LimitConnection>;
pub type StreamLimitConnections = BTreeMap<String, LimitConnection>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitConnection {
    pub passed: u64,
    pub rejected: u64,
    pub rejected_dry_run: u64,
}

pub type StreamServerZones = BTreeMap<String, StreamServerZone>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamServerZone {
    pub processing: u64,
    pub connections: u64,
    pub sessions: Sessions,
    pub discarded: u64,
    pub received: u64,
    pub sent: u64,
    pub ssl: Ssl,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sessions {
    #[serde(rename = "2xx")]
    pub sessions_2xx: u64,
    #[serde(rename = "4xx")]
    pub sessions_4xx: u64,
    #[serde(rename = "5xx")]
    pub sessions_5xx: u64,
    pub total: u64,
}

pub type StreamUpstreams = BTreeMap<String, StreamUpstream>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamUpstream {
    pub peers: Vec<StreamPeer>,
    pub zombies: u64,
    pub zone: String,
}

/// A server of a stream upstream as seen by the stats API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamPeer {
    pub id: u64,
    pub server: String,
    pub service: String,
    pub name: String,
    pub backup: bool,
    pub weight: u64,
    pub state: String,
    pub active: u64,
    pub ssl: Ssl,
    pub max_conns: u64,
    pub connections: u64,
    pub connect_time: u64,
    pub first_byte_time: u64,
    pub response_time: u64,
    pub sent: u64,
    pub received: u64,
    pub fails: u64,
    pub unavail: u64,
    pub health_checks: HealthChecks,
    pub downtime: u64,
    pub downstart: String,
    pub selected: String,
}

/// Cluster synchronization state of shared memory zones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamZoneSync {
    pub zones: BTreeMap<String, SyncZone>,
    pub status: StreamZoneSyncStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncZone {
    pub records_pending: u64,
    pub records_total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamZoneSyncStatus {
    pub bytes_in: u64,
    pub msgs_in: u64,
    pub msgs_out: u64,
    pub bytes_out: u64,
    pub nodes_online: u64,
}

/// Per worker process counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workers {
    pub id: u64,
    pub pid: u64,
    pub connections: Connections,
    pub http: WorkerHttp,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerHttp {
    pub requests: HttpRequests,
}
