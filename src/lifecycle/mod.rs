//! Process lifecycle.
//!
//! # Data Flow
//! ```text
//! main.rs:
//!     CLI → config → logging/metrics → engine → freeze → bind → serve
//!
//! shutdown.rs:
//!     trigger() → every subscriber wakes → axum stops accepting and drains
//!
//! signals.rs:
//!     SIGINT / SIGTERM → trigger()
//! ```
//!
//! # Design Decisions
//! - Routes are frozen before the first connection is accepted
//! - A single broadcast channel fans the stop signal out

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
