//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (request/response, applied changes)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → logging.rs installs a subscriber in binaries
//!     → any `metrics` recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (upstream, server, status) instead of formatted text
//! - The library never installs global state on its own

pub mod logging;
pub mod metrics;
