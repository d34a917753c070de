//! Upstream server management.
//!
//! # Data Flow
//! ```text
//! update_{http,stream}_servers(upstream, desired)
//!     → accessor.rs (GET live servers)
//!     → reconcile.rs (normalize addresses, partition, compare parameters)
//!     → accessor.rs (POST adds, DELETE removals, PATCH or replace updates)
//!     → ServerChanges { added, deleted, updated }
//! ```
//!
//! # Responsibilities
//! - Server types for both kinds (server.rs)
//! - Address normalization (address.rs)
//! - Single accessors with existence pre-checks (accessor.rs)
//! - Reconciliation of a desired list (reconcile.rs)
//!
//! # Design Decisions
//! - HTTP and stream share one implementation over [`UpstreamPeer`];
//!   http.rs and stream.rs only name the public entry points
//! - Changes are applied sequentially and the first failure is returned

pub mod accessor;
pub mod address;
pub mod http;
pub mod reconcile;
pub mod server;
pub mod stream;

pub use address::{add_port_to_server, DEFAULT_SERVER_PORT};
pub use reconcile::{determine_updates, have_same_parameters, ServerChanges};
pub use server::{ServerParameters, StreamUpstreamServer, UpstreamKind, UpstreamPeer, UpstreamServer};
