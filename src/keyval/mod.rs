//! Key-value zones.
//!
//! # Responsibilities
//! - Read one zone or every zone of a kind
//! - Add, modify and delete single keys
//! - Clear a zone
//!
//! # Design Decisions
//! - Existence is enforced by NGINX (409 on add, 404 on modify), not by a
//!   client-side pre-check; those answers surface as `NginxError::Api`
//! - Empty zone names and keys are rejected before any request

pub mod store;
pub mod types;

pub use types::{pairs, KeyValPairs, KeyValPairsByZone};
