//! # Kanon Middleware
//!
//! Request segment validation middleware.
//!
//! A [`ValidationMiddleware`] is built once per route from schema
//! declarations for the three request segments and then shared by every
//! request the route handles:
//!
//! ```text
//! build():   declarations ──► Normalizer ──► CompiledSegments (one per segment)
//!
//! process(): ctx.segments() ──► Executor ──► Aggregator ─┬─► write back ──► next
//!                                                        └─► Failure Dispatch
//! ```
//!
//! | Step | Module | When |
//! |------|--------|------|
//! | Normalize declarations | [`compile`] | once, at construction |
//! | Validate segments | [`execute`] | every request |
//! | Write back or collect failures | [`execute`] | every request |
//! | Pick and run a failure handler | [`handler`], [`stages::validation`] | failed requests |
//! | Process-wide defaults | [`options`] | construction and dispatch |
//!
//! ## Example
//!
//! ```
//! use kanon_core::{FieldSchema, SchemaExt};
//! use kanon_middleware::{SchemaDecl, ValidationMiddleware};
//!
//! let middleware = ValidationMiddleware::builder()
//!     .params(SchemaDecl::fields([("id", FieldSchema::integer().coerce().shared())]))
//!     .query(SchemaDecl::fields([
//!         ("name", FieldSchema::string().min_length(3).max_length(10).shared()),
//!         ("age", FieldSchema::integer().coerce().minimum(18).shared()),
//!     ]))
//!     .build()
//!     .unwrap();
//! # let _ = middleware;
//! ```

#![doc(html_root_url = "https://docs.rs/kanon-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod compile;
pub mod context;
pub mod execute;
pub mod handler;
pub mod middleware;
pub mod options;
pub mod stages;
pub mod types;

// Re-export main types at crate root
pub use compile::{CompiledSegments, SchemaDecl};
pub use context::MiddlewareContext;
pub use execute::{execute, SegmentInputs, SegmentOutcomes, ValidatedSegments};
pub use handler::{DefaultFailureHandler, FailureHandler, FnFailureHandler, SharedFailureHandler};
pub use middleware::{BoxFuture, FnMiddleware, Middleware, Next};
pub use options::{global_options, set_global_options, GlobalOptions, OptionsStore, OptionsUpdate};
pub use stages::validation::{ValidationBuilder, ValidationMiddleware};
pub use types::{Request, Response, ResponseExt};
