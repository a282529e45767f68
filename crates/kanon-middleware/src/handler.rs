//! Failure handlers.
//!
//! When at least one segment fails validation, exactly one
//! [`FailureHandler`] runs. It receives the ordered failures together with
//! the context, the request and the continuation, and is fully responsible
//! for the response: it may answer directly or call `next` itself.
//!
//! Handlers come from three places, in order of precedence:
//!
//! 1. the handler attached to the middleware's declaration,
//! 2. the handler in the [`GlobalOptions`](crate::GlobalOptions),
//! 3. [`DefaultFailureHandler`].

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Next};
use crate::types::{Request, Response, ResponseExt};
use http::StatusCode;
use kanon_core::SegmentFailure;
use std::sync::Arc;

/// A failure handler shared between middleware instances.
pub type SharedFailureHandler = Arc<dyn FailureHandler>;

/// Handles a request whose segments failed validation.
pub trait FailureHandler: Send + Sync + 'static {
    /// Produces the response for a failed request.
    ///
    /// `failures` is non-empty and ordered params, query, body.
    fn handle<'a>(
        &'a self,
        failures: Vec<SegmentFailure>,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// The built-in handler: `400 Bad Request` with the failures as a JSON array.
///
/// ```json
/// [{ "type": "query", "errors": [{ "path": ["age"], "message": "...", "code": "too_small" }] }]
/// ```
///
/// Never calls `next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFailureHandler;

impl DefaultFailureHandler {
    /// Renders the default failure response.
    #[must_use]
    pub fn response(failures: &[SegmentFailure]) -> Response {
        match serde_json::to_value(failures) {
            Ok(body) => Response::json(StatusCode::BAD_REQUEST, &body),
            Err(_) => Response::json_error(
                StatusCode::BAD_REQUEST,
                "VALIDATION_FAILED",
                "request validation failed",
            ),
        }
    }
}

impl FailureHandler for DefaultFailureHandler {
    fn handle<'a>(
        &'a self,
        failures: Vec<SegmentFailure>,
        _ctx: &'a mut MiddlewareContext,
        _request: Request,
        _next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move { Self::response(&failures) })
    }
}

/// A failure handler created from a function of the failures.
///
/// The function cannot continue the chain; implement [`FailureHandler`]
/// directly when the handler needs `next`.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use kanon_core::SegmentFailure;
/// use kanon_middleware::{FnFailureHandler, Response, ResponseExt};
///
/// let handler = FnFailureHandler::new(|failures: Vec<SegmentFailure>| {
///     Response::json_error(
///         StatusCode::UNPROCESSABLE_ENTITY,
///         "INVALID_REQUEST",
///         &format!("{} segment(s) failed", failures.len()),
///     )
/// });
/// # let _ = handler;
/// ```
pub struct FnFailureHandler<F> {
    func: F,
}

impl<F> FnFailureHandler<F>
where
    F: Fn(Vec<SegmentFailure>) -> Response + Send + Sync + 'static,
{
    /// Creates a new function-based failure handler.
    pub const fn new(func: F) -> Self {
        Self { func }
    }

    /// Creates the handler already wrapped for sharing.
    pub fn shared(func: F) -> SharedFailureHandler {
        Arc::new(Self::new(func))
    }
}

impl<F> FailureHandler for FnFailureHandler<F>
where
    F: Fn(Vec<SegmentFailure>) -> Response + Send + Sync + 'static,
{
    fn handle<'a>(
        &'a self,
        failures: Vec<SegmentFailure>,
        _ctx: &'a mut MiddlewareContext,
        _request: Request,
        _next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move { (self.func)(failures) })
    }
}
