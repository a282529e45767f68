//! The middleware seam and its continuation.
//!
//! Validation is one link in a host's chain. Each link gets the
//! per-request [`MiddlewareContext`] (which owns the [`RequestSegments`]),
//! the request, and a [`Next`]. A link either hands over with
//! [`Next::run`] or answers itself and drops `next`.
//!
//! [`RequestSegments`]: kanon_core::RequestSegments
//!
//! # Example
//!
//! A router-side link that names the route and fills in path params, so
//! that validation further down sees them:
//!
//! ```
//! use kanon_middleware::{BoxFuture, Middleware, MiddlewareContext, Next, Request, Response};
//! use serde_json::json;
//!
//! struct UserRoute;
//!
//! impl Middleware for UserRoute {
//!     fn name(&self) -> &'static str {
//!         "user_route"
//!     }
//!
//!     fn process<'a>(
//!         &'a self,
//!         ctx: &'a mut MiddlewareContext,
//!         request: Request,
//!         next: Next<'a>,
//!     ) -> BoxFuture<'a, Response> {
//!         Box::pin(async move {
//!             let id = request.uri().path().trim_start_matches("/users/").to_string();
//!             ctx.set_route("getUser".to_string());
//!             ctx.segments_mut().params = json!({ "id": id });
//!             next.run(ctx, request).await
//!         })
//!     }
//! }
//! ```

use crate::context::MiddlewareContext;
use crate::types::{Request, Response};
use std::future::Future;

pub use kanon_core::BoxFuture;

/// One link of a request chain.
///
/// `next` is consumed by [`Next::run`], so a link continues at most once.
/// Panics from further down are not caught.
pub trait Middleware: Send + Sync + 'static {
    /// Returns the name of this middleware, used in logs.
    fn name(&self) -> &'static str;

    /// Handles `request`, optionally continuing with `next`.
    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response>;
}

/// The rest of the chain: further links, then the route handler.
pub struct Next<'a> {
    inner: NextInner<'a>,
}

enum NextInner<'a> {
    Chain {
        middleware: &'a dyn Middleware,
        next: Box<Next<'a>>,
    },
    Handler(Box<dyn FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a>),
}

impl<'a> Next<'a> {
    /// Creates a `Next` that runs `middleware`, then `next`.
    pub fn new(middleware: &'a dyn Middleware, next: Next<'a>) -> Self {
        Self {
            inner: NextInner::Chain {
                middleware,
                next: Box::new(next),
            },
        }
    }

    /// Ends the chain in a route handler.
    ///
    /// The handler gets the context after every link has run, so it reads
    /// validated segments through `ctx.segments()`.
    pub fn handler<F>(f: F) -> Self
    where
        F: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        Self {
            inner: NextInner::Handler(Box::new(f)),
        }
    }

    /// Hands `ctx` and `request` to the rest of the chain.
    pub async fn run(self, ctx: &mut MiddlewareContext, request: Request) -> Response {
        match self.inner {
            NextInner::Chain { middleware, next } => {
                middleware.process(ctx, request, *next).await
            }
            NextInner::Handler(handler) => handler(ctx, request).await,
        }
    }
}

/// A link built from a function that always answers.
///
/// The function never sees `next`. Implement [`Middleware`] directly for
/// links that continue.
pub struct FnMiddleware<F> {
    name: &'static str,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Wraps `func` under `name`.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(&mut MiddlewareContext, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        _next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin((self.func)(ctx, request))
    }
}
