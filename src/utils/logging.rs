//! Tracing setup for the non-interactive entrypoints.
//!
//! The full-screen chat UI never installs a subscriber: stderr belongs to the
//! alternate screen there, and diagnostics from degraded turns are emitted as
//! no-op events unless a subscriber was installed by the embedding process.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize a stderr subscriber honoring `RUST_LOG`, falling back to the
/// given directive.
pub fn init(default_directive: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
