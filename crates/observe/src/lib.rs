//! Structured logging setup shared by the solver binary.

use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber with an [`EnvFilter`] seeded
/// from `default_filter`, overridable via the `RUST_LOG` environment
/// variable in the usual way.
///
/// Call once, at process startup, before any other `tracing` calls.
pub fn initialize(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
