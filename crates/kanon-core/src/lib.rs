//! # Kanon Core
//!
//! Core types for the Kanon request validation layer.
//!
//! This crate provides the foundational types used throughout Kanon:
//!
//! - [`Segment`] - The three independently validated request segments
//! - [`Schema`] - The compiled-schema capability the middleware consumes
//! - [`FieldSchema`] / [`ObjectSchema`] - A small schema kit with coercion
//! - [`Issue`] / [`ValidationError`] / [`SegmentFailure`] - Structured failures
//! - [`RequestSegments`] - The mutable per-request wrapper around segment data
//! - [`ObjectMode`] / [`MissingSchemaBehavior`] - Normalization modes
//!
//! ## Example
//!
//! ```
//! use kanon_core::{FieldSchema, ObjectMode, ObjectSchema, Schema};
//! use serde_json::json;
//!
//! let schema = ObjectSchema::new(ObjectMode::Lax)
//!     .field("name", FieldSchema::string().min_length(3))
//!     .field("age", FieldSchema::integer().coerce().minimum(18));
//!
//! let output = tokio_test::block_on(schema.validate(json!({"name": "Ann", "age": "20"})));
//! assert_eq!(output.unwrap(), json!({"name": "Ann", "age": 20}));
//! ```

#![doc(html_root_url = "https://docs.rs/kanon-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod field;
mod issue;
mod mode;
pub mod object;
mod request;
pub mod schema;
mod segment;

pub use error::ConfigurationError;
pub use field::FieldSchema;
pub use issue::{Issue, IssueCode, SegmentFailure, ValidationError};
pub use mode::{MissingSchemaBehavior, ObjectMode};
pub use object::ObjectSchema;
pub use request::{parse_query, RequestId, RequestSegments};
pub use schema::{schema_fn, AnySchema, BoxFuture, Schema, SchemaExt, SharedSchema};
pub use segment::Segment;
