//! Server address normalization.
//!
//! NGINX reports every server with an explicit port, so desired addresses are
//! brought into the same form before they are compared.
//! See <http://nginx.org/en/docs/http/ngx_http_upstream_module.html#server>.

/// Port NGINX assumes for an HTTP upstream server without one.
pub const DEFAULT_SERVER_PORT: u16 = 80;

/// Append [`DEFAULT_SERVER_PORT`] to an address without an explicit port.
pub fn add_port_to_server(server: &str) -> String {
    add_port(server, DEFAULT_SERVER_PORT)
}

/// Append `port` to an address without an explicit port.
///
/// `host:port`, `[ipv6]:port` and `unix:` paths are returned unchanged.
pub fn add_port(server: &str, port: u16) -> String {
    if server.starts_with("unix:") || has_port(server) {
        server.to_string()
    } else {
        format!("{server}:{port}")
    }
}

/// True if the address already names a port, or cannot take one.
fn has_port(server: &str) -> bool {
    if let Some(rest) = server.strip_prefix('[') {
        // Colons inside the brackets belong to the IPv6 literal.
        return match rest.split_once(']') {
            Some((_, tail)) => tail.starts_with(':'),
            None => true,
        };
    }

    // A bare IPv6 literal has several colons and no room for a port.
    server.contains(':')
}
