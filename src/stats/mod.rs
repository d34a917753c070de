//! NGINX Plus statistics.
//!
//! # Data Flow
//! ```text
//! get_stats()
//!     → GET /{v}/          (which top-level resources exist)
//!     → GET /{v}/stream/   (only if "stream" is listed)
//!     → GET each section in turn
//!     → Stats
//! ```
//!
//! # Design Decisions
//! - Requests are issued sequentially on the caller's task
//! - Configuration-dependent sections are absent, never an error: empty
//!   maps for stream zones and upstreams, `None` for zone sync and SSL

pub mod collector;
pub mod types;

pub use collector::is_path_not_found;
pub use types::*;
