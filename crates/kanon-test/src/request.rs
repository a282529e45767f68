//! Test request building.
//!
//! A [`TestRequest`] carries both halves a middleware needs: the HTTP
//! request and the already-extracted segments. The query segment is parsed
//! from the URI, path params are given explicitly (there is no router), and a
//! JSON body is stored both as bytes and as the parsed body segment.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, Uri};
use http_body_util::Full;
use kanon_core::RequestSegments;
use kanon_middleware::{MiddlewareContext, Request};
use serde::Serialize;
use serde_json::Value;

/// A test request ready to be run through a middleware.
#[derive(Debug)]
pub struct TestRequest {
    /// HTTP method
    pub method: Method,
    /// Request URI
    pub uri: Uri,
    /// Request headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Bytes,
    /// Extracted segments
    pub segments: RequestSegments,
    /// Route name
    pub route: Option<String>,
}

impl TestRequest {
    /// Creates a new GET request.
    pub fn get(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::GET, uri)
    }

    /// Creates a new POST request.
    pub fn post(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::POST, uri)
    }

    /// Creates a new PUT request.
    pub fn put(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PUT, uri)
    }

    /// Creates a new PATCH request.
    pub fn patch(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::PATCH, uri)
    }

    /// Creates a new DELETE request.
    pub fn delete(uri: impl AsRef<str>) -> TestRequestBuilder {
        TestRequestBuilder::new(Method::DELETE, uri)
    }

    /// Splits this request into a fresh context and an HTTP request.
    pub fn into_parts(self) -> Result<(MiddlewareContext, Request), TestError> {
        let mut builder = http::Request::builder().method(self.method).uri(self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name, value);
        }
        let request = builder
            .body(Full::new(self.body))
            .map_err(|e| TestError::RequestBuild(e.to_string()))?;

        let mut ctx = MiddlewareContext::with_segments(self.segments);
        if let Some(route) = self.route {
            ctx.set_route(route);
        }

        Ok((ctx, request))
    }
}

/// Builder for constructing test requests.
#[must_use]
pub struct TestRequestBuilder {
    method: Method,
    uri: String,
    headers: HeaderMap,
    body: Option<Bytes>,
    params: Option<Value>,
    parsed_body: Option<Value>,
    route: Option<String>,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Creates a new request builder.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            uri: uri.as_ref().to_string(),
            headers: HeaderMap::new(),
            body: None,
            params: None,
            parsed_body: None,
            route: None,
            error: None,
        }
    }

    /// Sets a header on the request.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => self.fail(TestError::RequestBuild("invalid header".to_string())),
        }
        self
    }

    /// Sets the path parameters the router would have resolved.
    ///
    /// ```
    /// use kanon_test::TestRequest;
    /// use serde_json::json;
    ///
    /// let request = TestRequest::get("/users/7").params([("id", "7")]).build().unwrap();
    /// assert_eq!(request.segments.params, json!({"id": "7"}));
    /// ```
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params = Some(RequestSegments::new().with_params(params).params);
        self
    }

    /// Sets the request body as JSON.
    ///
    /// The value also becomes the parsed body segment, and the
    /// `Content-Type` header is set to `application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(parsed) => {
                self.body = Some(Bytes::from(parsed.to_string()));
                self.parsed_body = Some(parsed);
            }
            Err(e) => self.fail(TestError::Json(e)),
        }
        self.header(header::CONTENT_TYPE.as_str(), "application/json")
    }

    /// Sets the route name carried by the context.
    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    fn fail(&mut self, error: TestError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Builds the test request.
    pub fn build(self) -> Result<TestRequest, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("Invalid URI: {e}")))?;

        let mut segments = RequestSegments::from_uri(&uri)
            .map_err(|e| TestError::RequestBuild(format!("Invalid query: {e}")))?;
        if let Some(params) = self.params {
            segments.params = params;
        }
        if let Some(body) = self.parsed_body {
            segments.body = body;
        }

        Ok(TestRequest {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body.unwrap_or_default(),
            segments,
            route: self.route,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_core::Segment;
    use serde_json::json;

    #[test]
    fn test_get_request() {
        let request = TestRequest::get("/users").build().unwrap();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.uri.path(), "/users");
        assert_eq!(request.segments, RequestSegments::new().with_query(json!({})));
    }

    #[test]
    fn test_query_is_parsed_from_uri() {
        let request = TestRequest::get("/users?name=Ann&age=20&tag=a&tag=b").build().unwrap();
        assert_eq!(
            request.segments.query,
            json!({"name": "Ann", "age": "20", "tag": ["a", "b"]})
        );
    }

    #[test]
    fn test_json_body_sets_segment_and_header() {
        let request = TestRequest::post("/users")
            .json(&json!({"name": "Ann"}))
            .build()
            .unwrap();

        assert_eq!(request.segments.body, json!({"name": "Ann"}));
        assert_eq!(request.body, Bytes::from(r#"{"name":"Ann"}"#));
        assert_eq!(
            request.headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_invalid_header_fails_build() {
        let result = TestRequest::get("/").header("bad header", "x").build();
        assert!(matches!(result, Err(TestError::RequestBuild(_))));
    }

    #[test]
    fn test_into_parts() {
        let (ctx, request) = TestRequest::delete("/users/7")
            .params([("id", "7")])
            .route("deleteUser")
            .build()
            .unwrap()
            .into_parts()
            .unwrap();

        assert_eq!(request.method(), Method::DELETE);
        assert_eq!(ctx.route(), Some("deleteUser"));
        assert_eq!(ctx.segment(Segment::Params), &json!({"id": "7"}));
    }
}
