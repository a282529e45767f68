//! Errors raised while loading Kanon settings.

use std::path::PathBuf;
use thiserror::Error;

/// Why a [`KanonConfig`](crate::KanonConfig) could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required settings file does not exist.
    #[error("kanon settings file {path} does not exist")]
    Missing {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// A settings file exists but could not be read.
    #[error("cannot read kanon settings file {path}")]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed TOML, or TOML with unknown sections or keys.
    #[error("bad TOML in kanon settings: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON, or JSON with unknown sections or keys.
    #[error("bad JSON in kanon settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting parsed but is not acceptable.
    #[error("setting `{key}` rejected: {reason}")]
    Invalid {
        /// Dotted setting key, e.g. `logging.level`.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An environment override (or `.env` file) could not be applied.
    #[error("environment override {var} rejected: {reason}")]
    Env {
        /// Variable name, or `.env` for the dotenv file.
        var: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The file extension or format name is neither TOML nor JSON.
    #[error("kanon settings must be TOML or JSON, got `{0}`")]
    UnknownFormat(String),
}

impl ConfigError {
    pub(crate) fn missing(path: impl Into<PathBuf>) -> Self {
        Self::Missing { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Rejects the setting at `key`.
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn env(var: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Env {
            var: var.into(),
            reason: reason.into(),
        }
    }
}
