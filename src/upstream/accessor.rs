//! Server accessors shared by HTTP and stream upstreams.
//!
//! Each operation is written once over [`UpstreamPeer`]; the kind decides the
//! path prefix. Add and delete look the server up first so that a duplicate
//! add or a missing delete never reaches the write endpoint.

use reqwest::StatusCode;

use crate::client::error::{NginxError, NginxResult};
use crate::client::NginxClient;
use crate::upstream::server::UpstreamPeer;

const UPSTREAMS: &str = "upstreams";
const SERVERS: &str = "servers";

impl NginxClient {
    /// All servers of an upstream group, as NGINX reports them.
    pub(crate) async fn get_servers<P: UpstreamPeer>(&self, upstream: &str) -> NginxResult<Vec<P>> {
        let prefix = P::KIND.path_prefix();
        self.get_json(
            &[prefix, UPSTREAMS, upstream, SERVERS],
            &format!("failed to get the servers of {upstream} {prefix} upstream"),
        )
        .await
    }

    /// Fail unless the upstream group exists.
    pub(crate) async fn check_exists<P: UpstreamPeer>(&self, upstream: &str) -> NginxResult<()> {
        self.get_servers::<P>(upstream).await.map(drop)
    }

    /// Live entry with the given address.
    async fn find_server<P: UpstreamPeer>(
        &self,
        upstream: &str,
        address: &str,
    ) -> NginxResult<Option<P>> {
        let servers = self.get_servers::<P>(upstream).await?;
        Ok(servers.into_iter().find(|s| s.address() == address))
    }

    pub(crate) async fn add_server<P: UpstreamPeer>(
        &self,
        upstream: &str,
        server: &P,
    ) -> NginxResult<()> {
        if self.find_server::<P>(upstream, server.address()).await?.is_some() {
            return Err(NginxError::AlreadyExists {
                upstream: upstream.to_string(),
                server: server.address().to_string(),
            });
        }

        let body = server.clone().with_id(None);
        self.post_json(
            &[P::KIND.path_prefix(), UPSTREAMS, upstream, SERVERS, ""],
            &body,
            StatusCode::CREATED,
            &format!("failed to add {} server to {upstream} upstream", server.address()),
        )
        .await?;

        tracing::info!(
            upstream = %upstream,
            kind = %P::KIND,
            server = %server.address(),
            "Added upstream server"
        );
        Ok(())
    }

    pub(crate) async fn delete_server<P: UpstreamPeer>(
        &self,
        upstream: &str,
        address: &str,
    ) -> NginxResult<()> {
        let Some(current) = self.find_server::<P>(upstream, address).await? else {
            return Err(NginxError::NotFound {
                upstream: upstream.to_string(),
                server: address.to_string(),
            });
        };
        let Some(id) = current.identity() else {
            return Err(NginxError::MissingId {
                upstream: upstream.to_string(),
                server: address.to_string(),
            });
        };

        let id = id.to_string();
        self.delete(
            &[P::KIND.path_prefix(), UPSTREAMS, upstream, SERVERS, id.as_str()],
            StatusCode::OK,
            &format!("failed to remove {address} server from {upstream} upstream"),
        )
        .await?;

        tracing::info!(
            upstream = %upstream,
            kind = %P::KIND,
            server = %address,
            id = %id,
            "Removed upstream server"
        );
        Ok(())
    }

    /// PATCH a server in place. The server must carry its live id.
    pub(crate) async fn update_server<P: UpstreamPeer>(
        &self,
        upstream: &str,
        server: &P,
    ) -> NginxResult<()> {
        let Some(id) = server.identity() else {
            return Err(NginxError::MissingId {
                upstream: upstream.to_string(),
                server: server.address().to_string(),
            });
        };

        let id = id.to_string();
        let body = server.clone().with_id(None);
        self.patch_json(
            &[P::KIND.path_prefix(), UPSTREAMS, upstream, SERVERS, id.as_str()],
            &body,
            StatusCode::OK,
            &format!("failed to update {} server of {upstream} upstream", server.address()),
        )
        .await?;

        tracing::info!(
            upstream = %upstream,
            kind = %P::KIND,
            server = %server.address(),
            id = %id,
            "Updated upstream server"
        );
        Ok(())
    }
}
