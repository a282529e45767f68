//! Middleware context types.
//!
//! The [`MiddlewareContext`] is built fresh for each request and carries the
//! request's segment data through the chain. Validation middleware reads the
//! raw segments from it and, on success, writes the coerced segments back so
//! downstream handlers see typed data under the same names.

use kanon_core::{RequestId, RequestSegments, Segment};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;

/// Context that flows through the middleware chain.
///
/// # Example
///
/// ```
/// use kanon_core::{RequestSegments, Segment};
/// use kanon_middleware::MiddlewareContext;
/// use serde_json::json;
///
/// let segments = RequestSegments::new().with_params([("id", "7")]);
/// let mut ctx = MiddlewareContext::with_segments(segments);
/// ctx.set_route("getUser".to_string());
///
/// assert_eq!(ctx.segment(Segment::Params), &json!({"id": "7"}));
/// assert_eq!(ctx.route(), Some("getUser"));
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Route name, when the host provides one.
    route: Option<String>,

    /// Path params, query and parsed body.
    segments: RequestSegments,

    /// When the request started processing.
    started_at: Instant,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a context with empty segments and a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_segments(RequestSegments::new())
    }

    /// Creates a context holding the given segments.
    #[must_use]
    pub fn with_segments(segments: RequestSegments) -> Self {
        Self {
            request_id: RequestId::new(),
            route: None,
            segments,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sets the request ID, e.g. one propagated from an upstream service.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the route name, if set.
    #[must_use]
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Sets the route name.
    pub fn set_route(&mut self, route: String) {
        self.route = Some(route);
    }

    /// Returns all segments.
    #[must_use]
    pub fn segments(&self) -> &RequestSegments {
        &self.segments
    }

    /// Returns all segments mutably.
    pub fn segments_mut(&mut self) -> &mut RequestSegments {
        &mut self.segments
    }

    /// Returns one segment's live value.
    #[must_use]
    pub fn segment(&self, segment: Segment) -> &serde_json::Value {
        self.segments.get(segment)
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}
