//! # Kanon
//!
//! Request segment validation for HTTP services.
//!
//! Kanon validates the three segments of an incoming request (path params,
//! query string and parsed body) against declared schemas before the route
//! handler runs. On success the coerced values replace the raw ones, so the
//! handler reads `{"id": 7}` rather than `{"id": "7"}`. On failure exactly one
//! failure handler answers, and the route handler is never reached unless that
//! handler continues the chain itself.
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`core`] | schemas, issues, segments, request data |
//! | [`middleware`] | the validation middleware, failure handlers, global options |
//! | [`config`] | typed configuration loaded from files and the environment |
//! | [`telemetry`] | `tracing` subscriber setup |
//!
//! ## Example
//!
//! ```
//! use kanon::prelude::*;
//!
//! let users = ValidationMiddleware::builder()
//!     .params(SchemaDecl::fields([("id", FieldSchema::integer().coerce().shared())]))
//!     .query(SchemaDecl::fields([
//!         ("name", FieldSchema::string().min_length(3).max_length(10).shared()),
//!         ("age", FieldSchema::integer().coerce().minimum(18).shared()),
//!     ]))
//!     .build()
//!     .unwrap();
//! # let _ = users;
//! ```
//!
//! ## Startup
//!
//! ```no_run
//! use kanon::config::ConfigLoader;
//!
//! # fn main() -> Result<(), kanon::InitError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("kanon.toml")?
//!     .with_env_prefix("KANON")
//!     .load()?;
//!
//! kanon::init(&config)?;
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/kanon/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use kanon_core as core;

// Re-export middleware types
pub use kanon_middleware as middleware;

// Re-export configuration types
pub use kanon_config as config;

// Re-export telemetry types
pub use kanon_telemetry as telemetry;

use kanon_config::{ConfigError, KanonConfig, ValidationSettings};
use kanon_middleware::{OptionsStore, OptionsUpdate};
use kanon_telemetry::TelemetryError;
use thiserror::Error;

/// Errors that can occur while starting up.
#[derive(Debug, Error)]
pub enum InitError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Initializes logging and the process-wide validation options.
///
/// Call once at startup, before building any middleware: strictness and
/// missing-schema behavior are read when a middleware is built.
///
/// # Errors
///
/// Returns [`InitError::Telemetry`] if a global subscriber is already
/// installed or the log level is invalid.
pub fn init(config: &KanonConfig) -> Result<(), InitError> {
    kanon_telemetry::init_logging(&config.logging.to_log_config())?;
    apply_settings(&OptionsStore::global(), &config.validation);
    Ok(())
}

/// Merges validation settings into `store`.
///
/// The global failure handler, if any, is left in place.
pub fn apply_settings(store: &OptionsStore, settings: &ValidationSettings) {
    store.update(
        OptionsUpdate::new()
            .default_schema_object(settings.default_schema_object)
            .missing_schema_behavior(settings.missing_schema_behavior),
    );
}

/// Prelude module for convenient imports.
///
/// ```
/// use kanon::prelude::*;
/// ```
pub mod prelude {
    pub use kanon_core::{
        schema_fn, AnySchema, FieldSchema, Issue, IssueCode, MissingSchemaBehavior, ObjectMode,
        ObjectSchema, RequestSegments, Schema, SchemaExt, Segment, SegmentFailure,
        ValidationError,
    };

    pub use kanon_middleware::{
        global_options, set_global_options, DefaultFailureHandler, FailureHandler,
        FnFailureHandler, Middleware,
        MiddlewareContext, Next, OptionsStore, OptionsUpdate, Request, Response, ResponseExt,
        SchemaDecl, SharedFailureHandler, ValidationMiddleware,
    };
}
