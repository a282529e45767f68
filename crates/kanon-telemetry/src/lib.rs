//! Logging setup for Kanon.
//!
//! The validation middleware reports what it does through `tracing` events.
//! This crate installs a `tracing-subscriber` that renders those events as
//! JSON lines for production or as pretty, human-readable output during
//! development.
//!
//! # Events
//!
//! The middleware emits these events; the field names are stable.
//!
//! | Event | Level | Fields |
//! |-------|-------|--------|
//! | `segment schema compiled` | debug | `segment`, `kind` |
//! | `request segments validated` | debug | `request_id`, `route` |
//! | `request validation failed` | info | `request_id`, `route`, `segments`, `issues` |
//! | `dispatching validation failure` | debug | `request_id`, `handler` |
//! | `validation options updated` | debug | `options` |
//!
//! # Example
//!
//! ```rust,ignore
//! use kanon_telemetry::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production())?;
//! ```

#![doc(html_root_url = "https://docs.rs/kanon-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
