//! Logging infrastructure for trellis services.
//!
//! This crate provides:
//! - Structured JSON or pretty logging through `tracing-subscriber`
//! - Standard event names and helper macros used across the workspace
//!
//! # Usage
//!
//! ```ignore
//! use trellis_telemetry::{init_logging, LogFormat, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("debug")
//!     .with_log_format(LogFormat::Pretty);
//!
//! init_logging(&config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::{events, init_logging};

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("invalid log level '{0}': {1}")]
    InvalidLevel(String, String),

    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}
