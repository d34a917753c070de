//! Shared utilities for integration testing: an in-memory NGINX Plus API.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

use nginx_plus_client::NginxClient;

const HREF: &str = "https://nginx.org/en/docs/http/ngx_http_api_module.html";

/// One request as seen by the fake server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub method: String,
    pub path: String,
}

/// Mutable state behind the fake API.
pub struct NginxState {
    pub versions: Vec<u32>,
    pub root_endpoints: Vec<String>,
    pub stream_endpoints: Vec<String>,
    pub http_upstreams: BTreeMap<String, Vec<Value>>,
    pub stream_upstreams: BTreeMap<String, Vec<Value>>,
    pub http_keyvals: BTreeMap<String, BTreeMap<String, String>>,
    pub stream_keyvals: BTreeMap<String, BTreeMap<String, String>>,
    /// Stats sections by path below the version, e.g. "http/requests".
    pub sections: HashMap<String, Value>,
    /// Raw responses by "METHOD path below the version".
    pub overrides: HashMap<String, (u16, String)>,
    /// Report unset server parameters with their defaults, as NGINX does.
    pub echo_defaults: bool,
    pub next_id: u64,
    pub requests: Vec<Recorded>,
}

impl Default for NginxState {
    fn default() -> Self {
        let names = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            versions: (1..=9).collect(),
            root_endpoints: names(&[
                "nginx", "processes", "connections", "slabs", "http", "stream", "resolvers",
                "ssl", "workers",
            ]),
            stream_endpoints: names(&["server_zones", "upstreams", "keyvals", "zone_sync", "limit_conns"]),
            http_upstreams: BTreeMap::from([("backend".to_string(), Vec::new())]),
            stream_upstreams: BTreeMap::from([("stream_backend".to_string(), Vec::new())]),
            http_keyvals: BTreeMap::from([("zone_one".to_string(), BTreeMap::new())]),
            stream_keyvals: BTreeMap::from([("zone_stream".to_string(), BTreeMap::new())]),
            sections: sample_sections(),
            overrides: HashMap::new(),
            echo_defaults: true,
            next_id: 0,
            requests: Vec::new(),
        }
    }
}

impl NginxState {
    /// NGINX without a `stream {}` block.
    pub fn without_stream() -> Self {
        let mut state = Self::default();
        state.root_endpoints.retain(|e| e != "stream");
        state.stream_endpoints.clear();
        state.sections.retain(|path, _| !path.starts_with("stream/"));
        state.stream_upstreams.clear();
        state.stream_keyvals.clear();
        state
    }

    pub fn with_versions(mut self, versions: &[u32]) -> Self {
        self.versions = versions.to_vec();
        self
    }
}

type Shared = Arc<Mutex<NginxState>>;

/// Handle to a running fake API.
pub struct FakeNginx {
    pub addr: SocketAddr,
    pub state: Shared,
}

impl FakeNginx {
    pub async fn start() -> Self {
        Self::start_with(NginxState::default()).await
    }

    pub async fn start_with(state: NginxState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Client on the newest version with default options.
    pub async fn client(&self) -> NginxClient {
        NginxClient::new(self.endpoint()).await.unwrap()
    }

    pub fn with_state<T>(&self, f: impl FnOnce(&mut NginxState) -> T) -> T {
        f(&mut self.state.lock().unwrap())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.with_state(|s| s.requests.clone())
    }

    pub fn clear_requests(&self) {
        self.with_state(|s| s.requests.clear());
    }

    /// Requests other than GET.
    pub fn writes(&self) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.method != "GET").collect()
    }

    /// Store servers exactly as given, assigning ids to those without one.
    pub fn seed_servers(&self, kind: &str, upstream: &str, servers: Vec<Value>) {
        self.with_state(|s| {
            let mut seeded = Vec::with_capacity(servers.len());
            for mut server in servers {
                if server.get("id").is_none() {
                    server["id"] = json!(s.next_id);
                    s.next_id += 1;
                }
                seeded.push(server);
            }
            let groups = match kind {
                "http" => &mut s.http_upstreams,
                _ => &mut s.stream_upstreams,
            };
            groups.insert(upstream.to_string(), seeded);
        });
    }

    pub fn servers(&self, kind: &str, upstream: &str) -> Vec<Value> {
        self.with_state(|s| {
            let groups = match kind {
                "http" => &s.http_upstreams,
                _ => &s.stream_upstreams,
            };
            groups.get(upstream).cloned().unwrap_or_default()
        })
    }
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, Json(json!(body))).into_response()
}

fn api_error(status: u16, code: &str, text: &str) -> Response {
    let body = json!({
        "error": {"status": status, "text": text, "code": code},
        "request_id": "e3f4ad2c6a0f1c1f8e7a0b9d1c2e3f40",
        "href": HREF,
    });
    (StatusCode::from_u16(status).unwrap(), Json(body)).into_response()
}

async fn handle(State(state): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    let mut state = state.lock().unwrap();
    state.requests.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
    });

    let Some(rest) = path.strip_prefix("/api") else {
        return api_error(404, "PathNotFound", "path not found");
    };
    if rest.is_empty() || rest == "/" {
        if let Some((status, raw)) = state.overrides.get(&format!("{method} /")) {
            return (StatusCode::from_u16(*status).unwrap(), raw.clone()).into_response();
        }
        return json_response(StatusCode::OK, &state.versions);
    }

    let segments: Vec<&str> = rest[1..].split('/').collect();
    match segments[0].parse::<u32>() {
        Ok(v) if state.versions.contains(&v) => {}
        _ => return api_error(404, "UnknownVersion", "unknown version"),
    }
    let rest = &segments[1..];

    let key = format!("{method} {}", rest.join("/"));
    if let Some((status, raw)) = state.overrides.get(&key) {
        return (StatusCode::from_u16(*status).unwrap(), raw.clone()).into_response();
    }

    route(&mut state, &method, rest, &body)
}

fn route(state: &mut NginxState, method: &Method, rest: &[&str], body: &[u8]) -> Response {
    match (method.as_str(), rest) {
        ("GET", [""]) => json_response(StatusCode::OK, &state.root_endpoints),
        ("GET", ["stream", ""]) if state.root_endpoints.iter().any(|e| e == "stream") => {
            json_response(StatusCode::OK, &state.stream_endpoints)
        }
        (_, [kind @ ("http" | "stream"), "upstreams", upstream, "servers", tail @ ..]) => {
            upstream_servers(state, method, kind, upstream, tail, body)
        }
        (_, [kind @ ("http" | "stream"), "keyvals", tail @ ..]) => {
            keyvals(state, method, kind, tail, body)
        }
        ("GET", _) => match state.sections.get(&rest.join("/")) {
            Some(section) => json_response(StatusCode::OK, section),
            None => api_error(404, "PathNotFound", "path not found"),
        },
        _ => api_error(405, "MethodNotSupported", "method not supported"),
    }
}

fn fill_defaults(server: &mut Map<String, Value>, http: bool) {
    let defaults = [
        ("weight", json!(1)),
        ("max_conns", json!(0)),
        ("max_fails", json!(1)),
        ("fail_timeout", json!("10s")),
        ("slow_start", json!("0s")),
        ("backup", json!(false)),
        ("down", json!(false)),
    ];
    for (key, value) in defaults {
        server.entry(key).or_insert(value);
    }
    if http {
        server.entry("route").or_insert(json!(""));
    }
}

fn upstream_servers(
    state: &mut NginxState,
    method: &Method,
    kind: &str,
    upstream: &str,
    tail: &[&str],
    body: &[u8],
) -> Response {
    let http = kind == "http";
    let groups = if http {
        &mut state.http_upstreams
    } else {
        &mut state.stream_upstreams
    };
    let Some(servers) = groups.get_mut(upstream) else {
        return api_error(404, "UpstreamNotFound", "upstream not found");
    };

    match (method.as_str(), tail) {
        ("GET", []) => json_response(StatusCode::OK, servers),
        ("POST", [""]) => {
            let Ok(Value::Object(mut server)) = serde_json::from_slice::<Value>(body) else {
                return api_error(400, "UpstreamConfFormatError", "invalid JSON body");
            };
            if server.contains_key("id") {
                return api_error(400, "UpstreamConfFormatError", "unknown \"id\" field");
            }
            let address = server.get("server").cloned().unwrap_or(Value::Null);
            if servers.iter().any(|s| s["server"] == address) {
                return api_error(409, "UpstreamServerAlreadyExists", "server already exists");
            }
            if state.echo_defaults {
                fill_defaults(&mut server, http);
            }
            server.insert("id".to_string(), json!(state.next_id));
            state.next_id += 1;
            let server = Value::Object(server);
            servers.push(server.clone());
            json_response(StatusCode::CREATED, &server)
        }
        ("PATCH", [id]) => {
            let Ok(Value::Object(patch)) = serde_json::from_slice::<Value>(body) else {
                return api_error(400, "UpstreamConfFormatError", "invalid JSON body");
            };
            if patch.contains_key("id") {
                return api_error(400, "UpstreamConfFormatError", "unknown \"id\" field");
            }
            let Some(server) = servers.iter_mut().find(|s| s["id"].to_string() == *id) else {
                return api_error(404, "UpstreamServerNotFound", "server not found");
            };
            for (key, value) in patch {
                server[key.as_str()] = value;
            }
            json_response(StatusCode::OK, server)
        }
        ("DELETE", [id]) => {
            let before = servers.len();
            servers.retain(|s| s["id"].to_string() != *id);
            if servers.len() == before {
                return api_error(404, "UpstreamServerNotFound", "server not found");
            }
            json_response(StatusCode::OK, servers)
        }
        _ => api_error(405, "MethodNotSupported", "method not supported"),
    }
}

fn keyvals(
    state: &mut NginxState,
    method: &Method,
    kind: &str,
    tail: &[&str],
    body: &[u8],
) -> Response {
    let zones = if kind == "http" {
        &mut state.http_keyvals
    } else {
        &mut state.stream_keyvals
    };

    let zone = match (method.as_str(), tail) {
        ("GET", []) => return json_response(StatusCode::OK, zones),
        (_, [zone]) => *zone,
        _ => return api_error(405, "MethodNotSupported", "method not supported"),
    };
    let Some(pairs) = zones.get_mut(zone) else {
        return api_error(404, "KeyvalZoneNotFound", "zone not found");
    };

    let parse = || match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    };

    match method.as_str() {
        "GET" => json_response(StatusCode::OK, pairs),
        "POST" => {
            let Some(map) = parse() else {
                return api_error(400, "KeyvalFormatError", "invalid JSON body");
            };
            if map.keys().any(|k| pairs.contains_key(k)) {
                return api_error(409, "KeyvalKeyExists", "key already exists");
            }
            for (key, value) in map {
                pairs.insert(key, value.as_str().unwrap_or_default().to_string());
            }
            StatusCode::CREATED.into_response()
        }
        "PATCH" => {
            let Some(map) = parse() else {
                return api_error(400, "KeyvalFormatError", "invalid JSON body");
            };
            for (key, value) in map {
                match value {
                    Value::Null => {
                        pairs.remove(&key);
                    }
                    Value::String(value) => {
                        let Some(current) = pairs.get_mut(&key) else {
                            return api_error(404, "KeyvalKeyNotFound", "key not found");
                        };
                        *current = value;
                    }
                    _ => return api_error(400, "KeyvalFormatError", "invalid value"),
                }
            }
            StatusCode::NO_CONTENT.into_response()
        }
        "DELETE" => {
            pairs.clear();
            StatusCode::NO_CONTENT.into_response()
        }
        _ => api_error(405, "MethodNotSupported", "method not supported"),
    }
}

fn sample_sections() -> HashMap<String, Value> {
    let sections = [
        (
            "nginx",
            json!({
                "version": "1.25.3",
                "build": "nginx-plus-r31",
                "address": "127.0.0.1",
                "generation": 2,
                "load_timestamp": "2024-01-10T10:00:00.000Z",
                "timestamp": "2024-01-10T10:05:00.000Z",
                "pid": 1234,
                "ppid": 1
            }),
        ),
        ("processes", json!({"respawned": 0})),
        ("connections", json!({"accepted": 120, "dropped": 0, "active": 3, "idle": 5})),
        (
            "slabs",
            json!({"backend": {"pages": {"used": 4, "free": 250}, "slots": {"8": {"used": 1, "free": 500, "reqs": 1, "fails": 0}}}}),
        ),
        ("http/requests", json!({"total": 5000, "current": 2})),
        (
            "http/server_zones",
            json!({"site": {
                "processing": 1,
                "requests": 4000,
                "responses": {"1xx": 0, "2xx": 3900, "3xx": 50, "4xx": 45, "5xx": 5, "codes": {"200": 3900}, "total": 4000},
                "discarded": 0,
                "received": 400000,
                "sent": 9000000
            }}),
        ),
        (
            "http/location_zones",
            json!({"root": {"requests": 10, "responses": {"2xx": 10, "total": 10}, "discarded": 0, "received": 100, "sent": 1000}}),
        ),
        (
            "http/upstreams",
            json!({"backend": {
                "peers": [{"id": 0, "server": "10.0.0.1:80", "name": "10.0.0.1:80", "backup": false, "weight": 1, "state": "up", "active": 0, "requests": 42, "health_checks": {"checks": 10, "fails": 0, "unhealthy": 0, "last_passed": true}}],
                "keepalive": 0,
                "zombies": 0,
                "zone": "backend"
            }}),
        ),
        (
            "http/caches",
            json!({"static": {"size": 1024, "max_size": 4096, "cold": false, "hit": {"responses": 5, "bytes": 500}, "miss": {"responses": 2, "bytes": 200, "responses_written": 2, "bytes_written": 200}}}),
        ),
        ("http/limit_reqs", json!({"login": {"passed": 10, "delayed": 1, "rejected": 2}})),
        ("http/limit_conns", json!({"addr": {"passed": 30, "rejected": 0}})),
        (
            "resolvers",
            json!({"dns": {"requests": {"name": 5, "srv": 0, "addr": 1}, "responses": {"noerror": 6}}}),
        ),
        (
            "ssl",
            json!({"handshakes": 79, "handshakes_failed": 21, "session_reuses": 15, "verify_failures": {"no_cert": 1}}),
        ),
        (
            "workers",
            json!([{"id": 0, "pid": 1235, "connections": {"accepted": 60, "active": 1}, "http": {"requests": {"total": 2500, "current": 1}}}]),
        ),
        (
            "stream/server_zones",
            json!({"dns_tcp": {"processing": 0, "connections": 7, "sessions": {"2xx": 7, "4xx": 0, "5xx": 0, "total": 7}, "discarded": 0, "received": 700, "sent": 1400}}),
        ),
        (
            "stream/upstreams",
            json!({"stream_backend": {"peers": [{"id": 0, "server": "10.0.0.1:53", "name": "10.0.0.1:53", "state": "up", "connections": 7, "connect_time": 1, "first_byte_time": 2, "response_time": 3}], "zombies": 0, "zone": "stream_backend"}}),
        ),
        ("stream/limit_conns", json!({"addr_stream": {"passed": 7, "rejected": 0}})),
        (
            "stream/zone_sync",
            json!({"zones": {"zone_one": {"records_pending": 0, "records_total": 3}}, "status": {"bytes_in": 10, "msgs_in": 1, "msgs_out": 1, "bytes_out": 10, "nodes_online": 2}}),
        ),
    ];

    sections
        .into_iter()
        .map(|(path, value)| (path.to_string(), value))
        .collect()
}
