//! Tracing/logging pipeline bootstrap.

use anyhow::anyhow;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shelf_kernel::settings::{LogFormat, TelemetrySettings};

const DEFAULT_FILTER: &str = "info,sqlx=warn";

/// Initialize the tracing subscriber from telemetry settings.
///
/// Filter precedence: `telemetry.log_filter` setting, then `RUST_LOG`,
/// then a default `info`-level directive.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = match &settings.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let registry = tracing_subscriber::registry().with(filter);

    let result = match settings.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };
    result.map_err(|err| anyhow!("failed to initialize tracing subscriber: {err}"))?;

    tracing::info!(format = ?settings.log_format, "telemetry initialized");
    Ok(())
}
