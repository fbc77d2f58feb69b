use time::{UtcOffset, format_description::well_known::Rfc3339};
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::OffsetTime, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::logger::{config::LoggerConfig, error::LoggerError, format::LoggerFormat};

/// Builds the subscriber for `cfg` and sets it as the global default.
pub(crate) fn install(cfg: &LoggerConfig) -> Result<(), LoggerError> {
    let filter = cfg.level.filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    match cfg.format {
        LoggerFormat::Text => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(cfg.use_color)
                .with_target(cfg.with_targets)
                .with_timer(local_rfc3339());
            set_global(registry.with(layer))
        }
        LoggerFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(cfg.with_targets)
                .with_timer(local_rfc3339());
            set_global(registry.with(layer))
        }
        LoggerFormat::Journald => journald(registry),
    }
}

// Local offset lookup fails once other threads exist; UTC then.
fn local_rfc3339() -> OffsetTime<Rfc3339> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetTime::new(offset, Rfc3339)
}

fn set_global<S>(subscriber: S) -> Result<(), LoggerError>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber.try_init().map_err(|e| {
        let msg = e.to_string();
        if msg.contains("SetGlobalDefaultError") || msg.contains("global default trace dispatcher")
        {
            LoggerError::AlreadyInitialized
        } else {
            LoggerError::InitializationFailed(msg)
        }
    })
}

type Filtered = tracing_subscriber::layer::Layered<EnvFilter, tracing_subscriber::Registry>;

#[cfg(all(target_os = "linux", feature = "journald"))]
fn journald(registry: Filtered) -> Result<(), LoggerError> {
    let layer = tracing_journald::layer()
        .map_err(|e| LoggerError::InitializationFailed(format!("journald: {e}")))?
        .with_syslog_identifier("helper-launcher".to_string());
    set_global(registry.with(layer))
}

#[cfg(not(all(target_os = "linux", feature = "journald")))]
fn journald(_registry: Filtered) -> Result<(), LoggerError> {
    Err(LoggerError::JournaldNotSupported)
}
