//! Structured logging: JSON to stdout in production, pretty output in
//! development.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// Sets up tracing-subscriber with either JSON or pretty format,
/// respecting the configured log level unless `RUST_LOG` is set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::InvalidLevel(config.log_level.clone(), e.to_string()))?;

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// Service is starting up.
    pub const STARTUP: &str = "startup";

    /// Service is shutting down.
    pub const SHUTDOWN: &str = "shutdown";

    /// Service is listening on an address.
    pub const LISTENING: &str = "listening";

    /// The route tree compile pass started.
    pub const COMPILE_STARTED: &str = "compile_started";

    /// The route tree compile pass finished (successfully or not).
    pub const COMPILE_FINISHED: &str = "compile_finished";

    /// A route could not be created or registered.
    pub const ROUTE_REJECTED: &str = "route_rejected";

    /// The API description was written to disk.
    pub const SCHEMA_WRITTEN: &str = "schema_written";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_startup {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STARTUP,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_shutdown {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SHUTDOWN,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_listening {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::LISTENING,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_compile_started {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::COMPILE_STARTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_compile_finished {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::COMPILE_FINISHED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_route_rejected {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::ROUTE_REJECTED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_schema_written {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SCHEMA_WRITTEN,
            $($field)*
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Logging can only be initialized once per test process, so these
    // tests stick to configuration logic.

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("PRETTY"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse("invalid"), None);
    }

    #[test]
    fn test_event_names_are_snake_case() {
        for name in [
            events::STARTUP,
            events::SHUTDOWN,
            events::LISTENING,
            events::COMPILE_STARTED,
            events::COMPILE_FINISHED,
            events::ROUTE_REJECTED,
            events::SCHEMA_WRITTEN,
        ] {
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn test_macros_expand_without_subscriber() {
        crate::log_compile_started!(routes = 3usize, "compiling");
        crate::log_route_rejected!(method = "GET", path = "/x", "rejected");
    }
}
