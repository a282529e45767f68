//! Per-request segment data.
//!
//! [`RequestSegments`] is the mutable request wrapper the middleware reads
//! from and writes validated output back into. It is built fresh for each
//! request by the host (router params, parsed query string, parsed body) and
//! handed to downstream handlers through the middleware context.

use crate::Segment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// The three named request segments.
///
/// Values are already structured: path parameters and query values are
/// strings (or arrays of strings for repeated query keys), and the body is
/// whatever the upstream body parser produced.
///
/// # Example
///
/// ```
/// use kanon_core::{RequestSegments, Segment};
/// use http::Uri;
/// use serde_json::json;
///
/// let uri: Uri = "/users/7?name=Ann&age=20".parse().unwrap();
/// let segments = RequestSegments::from_uri(&uri)
///     .unwrap()
///     .with_params([("id", "7")]);
///
/// assert_eq!(segments.get(Segment::Params), &json!({"id": "7"}));
/// assert_eq!(segments.get(Segment::Query), &json!({"name": "Ann", "age": "20"}));
/// assert_eq!(segments.input(Segment::Body), json!({}));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestSegments {
    /// Path parameters.
    pub params: Value,
    /// Query string parameters.
    pub query: Value,
    /// Parsed request body.
    pub body: Value,
}

impl RequestSegments {
    /// Creates segments with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates segments with the query parsed from `uri`.
    pub fn from_uri(uri: &http::Uri) -> Result<Self, serde_urlencoded::de::Error> {
        let query = parse_query(uri.query().unwrap_or(""))?;
        Ok(Self {
            query,
            ..Self::default()
        })
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map: Map<String, Value> = params
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self.params = Value::Object(map);
        self
    }

    /// Sets the query segment.
    #[must_use]
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    /// Sets the parsed body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Returns the live value of a segment.
    #[must_use]
    pub fn get(&self, segment: Segment) -> &Value {
        match segment {
            Segment::Params => &self.params,
            Segment::Query => &self.query,
            Segment::Body => &self.body,
        }
    }

    /// Overwrites a segment.
    pub fn set(&mut self, segment: Segment, value: Value) {
        match segment {
            Segment::Params => self.params = value,
            Segment::Query => self.query = value,
            Segment::Body => self.body = value,
        }
    }

    /// Returns a copy of a segment suitable as schema input.
    ///
    /// An absent (`null`) segment is presented as an empty object.
    #[must_use]
    pub fn input(&self, segment: Segment) -> Value {
        match self.get(segment) {
            Value::Null => Value::Object(Map::new()),
            value => value.clone(),
        }
    }
}

/// Parses a raw query string into a JSON object of strings.
///
/// Repeated keys are collected into an array in order of appearance.
pub fn parse_query(raw: &str) -> Result<Value, serde_urlencoded::de::Error> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;

    let mut map = Map::new();
    for (key, value) in pairs {
        match map.get_mut(&key) {
            None => {
                map.insert(key, Value::String(value));
            }
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
        }
    }

    Ok(Value::Object(map))
}
