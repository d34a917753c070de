//! HTTP upstream operations.

use crate::client::error::NginxResult;
use crate::client::NginxClient;
use crate::upstream::reconcile::ServerChanges;
use crate::upstream::server::UpstreamServer;

impl NginxClient {
    /// Fail unless the HTTP upstream group exists.
    pub async fn check_if_upstream_exists(&self, upstream: &str) -> NginxResult<()> {
        self.check_exists::<UpstreamServer>(upstream).await
    }

    /// Servers of an HTTP upstream group.
    pub async fn get_http_servers(&self, upstream: &str) -> NginxResult<Vec<UpstreamServer>> {
        self.get_servers(upstream).await
    }

    /// Add a server to an HTTP upstream group.
    ///
    /// Returns [`NginxError::AlreadyExists`](crate::client::NginxError::AlreadyExists)
    /// without writing if a server with the same address is present.
    pub async fn add_http_server(&self, upstream: &str, server: &UpstreamServer) -> NginxResult<()> {
        self.add_server(upstream, server).await
    }

    /// Remove the server with `address` from an HTTP upstream group.
    pub async fn delete_http_server(&self, upstream: &str, address: &str) -> NginxResult<()> {
        self.delete_server::<UpstreamServer>(upstream, address).await
    }

    /// Change the parameters of a server in place. `server.id` must be set.
    pub async fn update_http_server(
        &self,
        upstream: &str,
        server: &UpstreamServer,
    ) -> NginxResult<()> {
        self.update_server(upstream, server).await
    }

    /// Make the servers of an HTTP upstream group match `servers`.
    ///
    /// Portless addresses get port 80. Returns the applied changes.
    pub async fn update_http_servers(
        &self,
        upstream: &str,
        servers: &[UpstreamServer],
    ) -> NginxResult<ServerChanges<UpstreamServer>> {
        self.update_servers(upstream, servers).await
    }
}
