//! Built-in middleware.
//!
//! Middleware are ordinary handlers registered with `use_middleware`. A
//! middleware continues the chain by calling `Context::next()`; code after
//! that call runs once the rest of the chain has finished.

pub mod logger;

pub use logger::logger;
