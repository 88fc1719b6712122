//! Telemetry bootstrap for hosts and examples.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize basic tracing (EnvFilter + fmt layer).
///
/// Call once from the host application. Tests and libraries should not call
/// this; a second call returns an error from the subscriber registry.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "postmedia=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Telemetry initialized");
    Ok(())
}
