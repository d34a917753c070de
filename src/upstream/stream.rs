//! Stream (TCP/UDP) upstream operations.

use crate::client::error::NginxResult;
use crate::client::NginxClient;
use crate::upstream::reconcile::ServerChanges;
use crate::upstream::server::StreamUpstreamServer;

impl NginxClient {
    pub async fn check_if_stream_upstream_exists(&self, upstream: &str) -> NginxResult<()> {
        self.check_exists::<StreamUpstreamServer>(upstream).await
    }

    pub async fn get_stream_servers(
        &self,
        upstream: &str,
    ) -> NginxResult<Vec<StreamUpstreamServer>> {
        self.get_servers(upstream).await
    }

    pub async fn add_stream_server(
        &self,
        upstream: &str,
        server: &StreamUpstreamServer,
    ) -> NginxResult<()> {
        self.add_server(upstream, server).await
    }

    pub async fn delete_stream_server(&self, upstream: &str, address: &str) -> NginxResult<()> {
        self.delete_server::<StreamUpstreamServer>(upstream, address).await
    }

    pub async fn update_stream_server(
        &self,
        upstream: &str,
        server: &StreamUpstreamServer,
    ) -> NginxResult<()> {
        self.update_server(upstream, server).await
    }

    /// Make the servers of a stream upstream group match `servers`.
    ///
    /// Addresses are compared as given; stream servers need an explicit port.
    pub async fn update_stream_servers(
        &self,
        upstream: &str,
        servers: &[StreamUpstreamServer],
    ) -> NginxResult<ServerChanges<StreamUpstreamServer>> {
        self.update_servers(upstream, servers).await
    }
}
