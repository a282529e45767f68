//! Test response wrapper.

use crate::error::TestError;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, StatusCode};
use http_body_util::BodyExt;
use kanon_core::SegmentFailure;
use serde::de::DeserializeOwned;
use std::fmt;

/// A test response with helper methods for assertions.
#[derive(Debug, Clone)]
pub struct TestResponse {
    /// HTTP status code
    status: StatusCode,
    /// Response headers
    headers: HeaderMap,
    /// Response body bytes
    body: Bytes,
}

impl TestResponse {
    /// Creates a new test response from an HTTP response.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Returns the status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns true if the status is successful (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns a reference to the headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Gets a header value by name.
    #[must_use]
    pub fn header(&self, name: impl AsRef<str>) -> Option<&HeaderValue> {
        self.headers.get(name.as_ref())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
            .and_then(|v| v.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns the body as a string.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("Invalid UTF-8: {e}")))
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_slice(&self.body).map_err(TestError::Json)
    }

    /// Deserializes the body as a JSON Value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Deserializes the body as the default failure response.
    pub fn failures(&self) -> Result<Vec<SegmentFailure>, TestError> {
        self.json()
    }

    // Assertion methods

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {}: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that the body is the default failure response for exactly
    /// the given segments, in order.
    ///
    /// # Panics
    ///
    /// Panics if the status is not 400 or the failed segments differ.
    pub fn assert_failed_segments(&self, expected: &[&str]) -> &Self {
        self.assert_status(StatusCode::BAD_REQUEST);
        let failures = self
            .failures()
            .unwrap_or_else(|e| panic!("Expected failure body: {e}"));
        let segments: Vec<&str> = failures.iter().map(|f| f.segment.as_str()).collect();
        assert_eq!(segments, expected, "Unexpected failed segments");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use kanon_core::{IssueCode, Segment};

    fn response(status: StatusCode, body: &str) -> http::Response<Full<Bytes>> {
        http::Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    #[tokio::test]
    async fn test_from_http() {
        let response = TestResponse::from_http(response(StatusCode::OK, r#"{"ok":true}"#))
            .await
            .unwrap();

        assert!(response.is_success());
        assert_eq!(response.content_type(), Some("application/json"));
        assert_eq!(response.text().unwrap(), r#"{"ok":true}"#);
        assert_eq!(response.json_value().unwrap()["ok"], true);
    }

    #[tokio::test]
    async fn test_failures() {
        let body = r#"[{"type":"query","errors":[{"path":["age"],"message":"Number must be greater than or equal to 18","code":"too_small"}]}]"#;
        let response = TestResponse::from_http(response(StatusCode::BAD_REQUEST, body))
            .await
            .unwrap();

        let failures = response.failures().unwrap();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].segment, Segment::Query);
        assert_eq!(failures[0].issues[0].code, IssueCode::TooSmall);

        response.assert_failed_segments(&["query"]);
    }

    #[tokio::test]
    #[should_panic(expected = "Expected status")]
    async fn test_assert_status_panics() {
        let response = TestResponse::from_http(response(StatusCode::OK, "{}"))
            .await
            .unwrap();
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
