//! Upstream reconciliation.
//!
//! # Responsibilities
//! - Partition desired vs live servers into add/delete/update sets
//! - Decide parameter equality against the documented NGINX defaults
//! - Apply the sets in order: adds, deletes, updates
//!
//! # Design Decisions
//! - Servers are joined on address only; ids are attached to updates from
//!   the live entry because the caller cannot know them
//! - A parameter set on the desired side and unset on the live side always
//!   counts as a change, even if it equals the default
//! - The first failed operation aborts the run; nothing is rolled back

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::client::error::NginxResult;
use crate::client::NginxClient;
use crate::config::{ServerDefaults, UpdateStrategy};
use crate::observability::metrics;
use crate::upstream::address::add_port;
use crate::upstream::server::{ServerParameters, UpstreamKind, UpstreamPeer};

/// Changes computed (and, after a successful update, applied) for one
/// upstream group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerChanges<P> {
    /// Desired servers missing from NGINX.
    pub added: Vec<P>,
    /// Live servers missing from the desired list, as NGINX reported them.
    pub deleted: Vec<P>,
    /// Desired servers whose parameters differ. Each entry is the caller's
    /// server with its address normalized and `id` set to the live server's
    /// id, so it can be sent to the PATCH endpoint as is.
    pub updated: Vec<P>,
}

impl<P> Default for ServerChanges<P> {
    fn default() -> Self {
        Self {
            added: Vec::new(),
            deleted: Vec::new(),
            updated: Vec::new(),
        }
    }
}

impl<P> ServerChanges<P> {
    /// True if NGINX already matches the desired list.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }
}

/// Compare the parameters of a desired server with a live one.
///
/// Address and id are not part of the comparison. A parameter unset on the
/// desired side but reported by NGINX is compared as its default.
pub fn have_same_parameters(
    desired: &ServerParameters<'_>,
    live: &ServerParameters<'_>,
    defaults: &ServerDefaults,
) -> bool {
    same(desired.max_conns, live.max_conns, defaults.max_conns)
        && same(desired.max_fails, live.max_fails, defaults.max_fails)
        && same(desired.fail_timeout, live.fail_timeout, defaults.fail_timeout.as_str())
        && same(desired.slow_start, live.slow_start, defaults.slow_start.as_str())
        && same(desired.route, live.route, "")
        && same(desired.backup, live.backup, defaults.backup)
        && same(desired.down, live.down, defaults.down)
        && same(desired.drain, live.drain, false)
        && same(desired.weight, live.weight, defaults.weight)
        && same(desired.service, live.service, "")
}

fn same<T: PartialEq>(desired: Option<T>, live: Option<T>, default: T) -> bool {
    match (desired, live) {
        (None, Some(live)) => default == live,
        (desired, live) => desired == live,
    }
}

/// Partition `desired` against `live` by address.
///
/// Desired addresses are normalized with the kind's default port first. When
/// an address appears more than once in `desired`, the first entry wins.
pub fn determine_updates<P: UpstreamPeer>(
    desired: &[P],
    live: &[P],
    defaults: &ServerDefaults,
) -> ServerChanges<P> {
    let live_by_address: HashMap<&str, &P> = live.iter().map(|s| (s.address(), s)).collect();
    let mut seen: HashSet<String> = HashSet::with_capacity(desired.len());
    let mut changes = ServerChanges::default();

    for server in desired {
        let mut server = server.clone();
        if let Some(port) = P::DEFAULT_PORT {
            let address = add_port(server.address(), port);
            server.set_address(address);
        }

        if !seen.insert(server.address().to_string()) {
            tracing::warn!(
                server = %server.address(),
                "Duplicate server in desired list, keeping the first entry"
            );
            continue;
        }

        match live_by_address.get(server.address()) {
            None => changes.added.push(server),
            Some(current) => {
                if !have_same_parameters(&server.parameters(), &current.parameters(), defaults) {
                    changes.updated.push(server.with_id(current.identity()));
                }
            }
        }
    }

    changes.deleted = live
        .iter()
        .filter(|s| !seen.contains(s.address()))
        .cloned()
        .collect();

    changes
}

impl NginxClient {
    fn update_strategy(&self, kind: UpstreamKind) -> UpdateStrategy {
        match kind {
            UpstreamKind::Http => self.update.http,
            UpstreamKind::Stream => self.update.stream,
        }
    }

    /// Bring the servers of `upstream` in line with `desired`.
    pub(crate) async fn update_servers<P: UpstreamPeer>(
        &self,
        upstream: &str,
        desired: &[P],
    ) -> NginxResult<ServerChanges<P>> {
        let live = self.get_servers::<P>(upstream).await?;
        let changes = determine_updates(desired, &live, &self.defaults);

        tracing::debug!(
            upstream = %upstream,
            kind = %P::KIND,
            to_add = changes.added.len(),
            to_delete = changes.deleted.len(),
            to_update = changes.updated.len(),
            "Computed upstream changes"
        );

        for server in &changes.added {
            self.add_server(upstream, server).await?;
        }
        metrics::record_reconcile_changes(P::KIND.path_prefix(), "add", changes.added.len());

        for server in &changes.deleted {
            self.delete_server::<P>(upstream, server.address()).await?;
        }
        metrics::record_reconcile_changes(P::KIND.path_prefix(), "delete", changes.deleted.len());

        let strategy = self.update_strategy(P::KIND);
        for server in &changes.updated {
            match strategy {
                UpdateStrategy::Patch => self.update_server(upstream, server).await?,
                UpdateStrategy::Replace => {
                    self.delete_server::<P>(upstream, server.address()).await?;
                    self.add_server(upstream, server).await?;
                }
            }
        }
        metrics::record_reconcile_changes(P::KIND.path_prefix(), "update", changes.updated.len());

        if !changes.is_empty() {
            tracing::info!(
                upstream = %upstream,
                kind = %P::KIND,
                added = changes.added.len(),
                deleted = changes.deleted.len(),
                updated = changes.updated.len(),
                "Upstream servers reconciled"
            );
        }

        Ok(changes)
    }
}
