//! Typed configuration for Kanon.
//!
//! Provides a strongly-typed configuration for the validation layer with
//! support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! The root type is [`KanonConfig`]:
//!
//! - [`ValidationSettings`] - process-wide validation defaults
//! - [`LoggingSettings`] - log level and output format
//!
//! # Example
//!
//! ```no_run
//! use kanon_config::ConfigLoader;
//!
//! # fn main() -> Result<(), kanon_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_defaults()
//!     .with_file("kanon.toml")?
//!     .with_env_prefix("KANON")
//!     .load()?;
//!
//! println!("Mappings are {:?}", config.validation.default_schema_object);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [validation]
//! default_schema_object = "strict"
//! missing_schema_behavior = "any"
//!
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden via environment variables using the format
//! `PREFIX__SECTION__KEY`:
//!
//! - `KANON__VALIDATION__DEFAULT_SCHEMA_OBJECT=strict`
//! - `KANON__VALIDATION__MISSING_SCHEMA_BEHAVIOR=any`
//! - `KANON__LOGGING__LEVEL=debug`
//! - `KANON__LOGGING__FORMAT=pretty`
//! - `KANON__LOGGING__ENABLED=false`

#![doc(html_root_url = "https://docs.rs/kanon-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::KanonConfig;
pub use error::ConfigError;
pub use kanon_telemetry::LogFormat;
pub use loader::ConfigLoader;
pub use schema::{LoggingSettings, ValidationSettings};
