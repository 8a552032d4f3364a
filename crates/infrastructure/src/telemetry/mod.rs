//! Logging initialization
//!
//! Console logging through `tracing-subscriber`, filtered by `RUST_LOG` or
//! the configured directives.

mod subscriber;

pub use subscriber::{LogFormat, TelemetryError, init_tracing};
