//! Request segment validation middleware.
//!
//! Validates path params, query and body against schemas compiled when the
//! middleware is built.
//!
//! # Behavior
//!
//! 1. Read the raw segments from the [`MiddlewareContext`]
//! 2. Validate all three segments, collecting every failure
//! 3. If all passed, write the coerced values back and call `next` once
//! 4. Otherwise leave the request untouched and run exactly one failure
//!    handler: the middleware's own, the global one, or the default
//!
//! # Example
//!
//! ```
//! use kanon_core::{FieldSchema, SchemaExt};
//! use kanon_middleware::{SchemaDecl, ValidationMiddleware};
//!
//! let middleware = ValidationMiddleware::builder()
//!     .params(SchemaDecl::fields([("id", FieldSchema::integer().coerce().shared())]))
//!     .build()
//!     .unwrap();
//! # let _ = middleware;
//! ```

use crate::compile::{CompiledSegments, SchemaDecl};
use crate::context::MiddlewareContext;
use crate::execute::{execute, SegmentInputs};
use crate::handler::{DefaultFailureHandler, SharedFailureHandler};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::options::OptionsStore;
use crate::types::{Request, Response};
use kanon_core::{ConfigurationError, Segment, SegmentFailure};
use std::sync::Arc;

/// Middleware that validates request segments.
#[derive(Clone)]
pub struct ValidationMiddleware {
    /// One compiled schema per segment.
    compiled: CompiledSegments,
    /// Handler attached to this middleware, if any.
    handler: Option<SharedFailureHandler>,
    /// Store consulted for the global handler on each failed request.
    options: Arc<OptionsStore>,
}

impl std::fmt::Debug for ValidationMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationMiddleware")
            .field("compiled", &self.compiled)
            .field("handler", &self.handler.as_ref().map(|_| "local"))
            .finish_non_exhaustive()
    }
}

/// Where the failure handler for a request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandlerSource {
    Local,
    Global,
    Default,
}

impl HandlerSource {
    fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
            Self::Default => "default",
        }
    }
}

impl ValidationMiddleware {
    /// Creates a builder with no segment declared.
    #[must_use]
    pub fn builder() -> ValidationBuilder {
        ValidationBuilder::default()
    }

    /// Returns the compiled segment schemas.
    #[must_use]
    pub fn compiled(&self) -> &CompiledSegments {
        &self.compiled
    }

    /// Picks the failure handler for the current request.
    ///
    /// The global handler is read from the store each time, so a handler
    /// installed after construction takes effect immediately.
    fn resolve_handler(&self) -> (SharedFailureHandler, HandlerSource) {
        if let Some(handler) = &self.handler {
            return (Arc::clone(handler), HandlerSource::Local);
        }
        match &self.options.snapshot().handler {
            Some(handler) => (Arc::clone(handler), HandlerSource::Global),
            None => (Arc::new(DefaultFailureHandler), HandlerSource::Default),
        }
    }
}

impl Middleware for ValidationMiddleware {
    fn name(&self) -> &'static str {
        "request_validation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let inputs = SegmentInputs::from_segments(ctx.segments());
            let outcomes = execute(&self.compiled, inputs).await;

            match outcomes.into_validated() {
                Ok(validated) => {
                    validated.apply(ctx.segments_mut());
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        route = ctx.route().unwrap_or("unknown"),
                        "request segments validated"
                    );
                    next.run(ctx, request).await
                }
                Err(failures) => {
                    log_failures(ctx, &failures);

                    let (handler, source) = self.resolve_handler();
                    tracing::debug!(
                        request_id = %ctx.request_id(),
                        handler = source.as_str(),
                        "dispatching validation failure"
                    );
                    handler.handle(failures, ctx, request, next).await
                }
            }
        })
    }
}

fn log_failures(ctx: &MiddlewareContext, failures: &[SegmentFailure]) {
    let segments: Vec<&str> = failures.iter().map(|f| f.segment.as_str()).collect();
    let issues: usize = failures.iter().map(|f| f.issues.len()).sum();
    tracing::info!(
        request_id = %ctx.request_id(),
        route = ctx.route().unwrap_or("unknown"),
        segments = ?segments,
        issues,
        "request validation failed"
    );
}

/// Builder for [`ValidationMiddleware`].
///
/// Each segment may be declared at most once. Declaring a segment twice is
/// reported by [`build`](Self::build).
#[derive(Default)]
pub struct ValidationBuilder {
    params: Option<SchemaDecl>,
    query: Option<SchemaDecl>,
    body: Option<SchemaDecl>,
    handler: Option<SharedFailureHandler>,
    options: Option<Arc<OptionsStore>>,
    error: Option<ConfigurationError>,
}

impl ValidationBuilder {
    /// Declares the path parameter schema.
    #[must_use]
    pub fn params(self, decl: SchemaDecl) -> Self {
        self.declare(Segment::Params, decl)
    }

    /// Declares the query schema.
    #[must_use]
    pub fn query(self, decl: SchemaDecl) -> Self {
        self.declare(Segment::Query, decl)
    }

    /// Declares the body schema.
    #[must_use]
    pub fn body(self, decl: SchemaDecl) -> Self {
        self.declare(Segment::Body, decl)
    }

    /// Attaches a failure handler that takes precedence over the global one.
    #[must_use]
    pub fn handler(mut self, handler: SharedFailureHandler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Uses `store` instead of the process-wide options.
    #[must_use]
    pub fn options(mut self, store: Arc<OptionsStore>) -> Self {
        self.options = Some(store);
        self
    }

    fn declare(mut self, segment: Segment, decl: SchemaDecl) -> Self {
        let slot = match segment {
            Segment::Params => &mut self.params,
            Segment::Query => &mut self.query,
            Segment::Body => &mut self.body,
        };
        if slot.is_none() {
            *slot = Some(decl);
        } else if self.error.is_none() {
            self.error = Some(ConfigurationError::SegmentDeclaredTwice { segment });
        }
        self
    }

    /// Compiles the declarations.
    ///
    /// Strictness and missing-schema behavior are taken from the options as
    /// they are now; later changes do not affect this middleware.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if a segment was declared twice or a
    /// field mapping is malformed.
    pub fn build(self) -> Result<ValidationMiddleware, ConfigurationError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let store = self.options.unwrap_or_else(OptionsStore::global);
        let options = store.snapshot();
        let compiled = CompiledSegments::compile(self.params, self.query, self.body, &options)?;

        Ok(ValidationMiddleware {
            compiled,
            handler: self.handler,
            options: store,
        })
    }
}
