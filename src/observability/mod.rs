//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Registration and dispatch emit:
//!     → logging.rs (tracing events: routes registered, misses, request lines)
//!     → metrics.rs (request counter and latency histogram)
//!
//! Sinks:
//!     → stdout, pretty or one JSON object per line
//!     → optional Prometheus scrape endpoint
//! ```
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured filter
//! - Request ID flows from the HTTP layer into handler contexts
//! - Nothing is recorded until an exporter is installed

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
