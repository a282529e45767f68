//! # Kanon Test
//!
//! Test utilities for Kanon validation middleware. Requests are driven
//! in-memory through a single middleware into a recording route handler, so
//! a test can check both the response and what the route would have seen.
//!
//! ## Example
//!
//! ```
//! use kanon_core::{FieldSchema, SchemaExt};
//! use kanon_middleware::{OptionsStore, SchemaDecl, ValidationMiddleware};
//! use kanon_test::{run, TestRequest};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let middleware = ValidationMiddleware::builder()
//!     .query(SchemaDecl::fields([("page", FieldSchema::integer().coerce().shared())]))
//!     .options(Arc::new(OptionsStore::new()))
//!     .build()
//!     .unwrap();
//!
//! let request = TestRequest::get("/items?page=2").build().unwrap();
//! let outcome = run(&middleware, request).await.unwrap();
//!
//! assert_eq!(outcome.continued, 1);
//! assert_eq!(outcome.seen.unwrap().query, json!({"page": 2}));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/kanon-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod request;
mod response;

pub use error::TestError;
pub use request::{TestRequest, TestRequestBuilder};
pub use response::TestResponse;

use http::StatusCode;
use kanon_core::RequestSegments;
use kanon_middleware::{Middleware, MiddlewareContext, Next, Response, ResponseExt};
use parking_lot::Mutex;
use std::sync::Arc;

/// What happened when a request was run through a middleware.
#[derive(Debug)]
pub struct Outcome {
    /// The response the middleware produced.
    pub response: TestResponse,
    /// How many times the route handler was reached.
    pub continued: usize,
    /// The segments the route handler saw, if it was reached.
    pub seen: Option<RequestSegments>,
    /// The context after the middleware returned.
    pub context: MiddlewareContext,
}

#[derive(Default)]
struct Recording {
    continued: usize,
    seen: Option<RequestSegments>,
}

/// Runs `request` through `middleware` into a recording route handler.
///
/// The route handler answers `200 OK` with the segments it received as a
/// JSON body.
pub async fn run<M>(middleware: &M, request: TestRequest) -> Result<Outcome, TestError>
where
    M: Middleware + ?Sized,
{
    let (mut ctx, request) = request.into_parts()?;
    let recording = Arc::new(Mutex::new(Recording::default()));

    let next = {
        let recording = Arc::clone(&recording);
        Next::handler(move |ctx: &mut MiddlewareContext, _request| {
            let segments = ctx.segments().clone();
            let body = serde_json::to_value(&segments).unwrap_or_default();
            let mut recording = recording.lock();
            recording.continued += 1;
            recording.seen = Some(segments);
            Box::pin(async move { Response::json(StatusCode::OK, &body) })
        })
    };

    let response = middleware.process(&mut ctx, request, next).await;
    let response = TestResponse::from_http(response).await?;

    let recording = std::mem::take(&mut *recording.lock());
    Ok(Outcome {
        response,
        continued: recording.continued,
        seen: recording.seen,
        context: ctx,
    })
}
