//! Scalar and array field schemas.
//!
//! [`FieldSchema`] covers the leaf types that appear in path parameters,
//! query strings and bodies. Path and query values always arrive as strings,
//! so numeric and boolean schemas only accept them when coercion is declared
//! with [`FieldSchema::coerce`].
//!
//! # Example
//!
//! ```
//! use kanon_core::{FieldSchema, Schema};
//! use serde_json::json;
//!
//! let age = FieldSchema::integer().coerce().minimum(18);
//!
//! let coerced = tokio_test::block_on(age.validate(json!("42"))).unwrap();
//! assert_eq!(coerced, json!(42));
//!
//! // Without coercion a string is a type error.
//! let strict_age = FieldSchema::integer();
//! assert!(tokio_test::block_on(strict_age.validate(json!("42"))).is_err());
//! ```

use crate::schema::{BoxFuture, Schema};
use crate::{Issue, IssueCode, ValidationError};
use regex::Regex;
use serde_json::{Number, Value};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A leaf field schema.
#[derive(Debug, Clone)]
pub enum FieldSchema {
    /// String type.
    String {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Pattern the whole string must match.
        pattern: Option<Regex>,
    },
    /// Integer type.
    Integer {
        /// Minimum value.
        minimum: Option<i64>,
        /// Maximum value.
        maximum: Option<i64>,
        /// Whether strings are parsed into integers.
        coerce: bool,
    },
    /// Number type.
    Number {
        /// Minimum value.
        minimum: Option<f64>,
        /// Maximum value.
        maximum: Option<f64>,
        /// Whether strings are parsed into numbers.
        coerce: bool,
    },
    /// Boolean type.
    Boolean {
        /// Whether `"true"`, `"false"`, `"1"` and `"0"` are accepted.
        coerce: bool,
    },
    /// Array type.
    Array {
        /// Schema for array items.
        items: Box<FieldSchema>,
        /// Minimum number of items.
        min_items: Option<usize>,
        /// Maximum number of items.
        max_items: Option<usize>,
    },
    /// One of a fixed set of strings.
    Enum {
        /// Allowed values.
        values: Vec<String>,
    },
    /// Any type (accepts anything).
    Any,
    /// A builder modifier was applied to a kind it does not fit.
    ///
    /// Reported by [`Schema::declaration_error`] so the declaration fails
    /// when the middleware is built; validating against it always fails.
    Misdeclared {
        /// What was misapplied, e.g. "`minimum` does not apply to string".
        reason: String,
    },
}

impl FieldSchema {
    /// Creates a string schema.
    #[must_use]
    pub fn string() -> Self {
        Self::String {
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Creates an integer schema.
    #[must_use]
    pub fn integer() -> Self {
        Self::Integer {
            minimum: None,
            maximum: None,
            coerce: false,
        }
    }

    /// Creates a number schema.
    #[must_use]
    pub fn number() -> Self {
        Self::Number {
            minimum: None,
            maximum: None,
            coerce: false,
        }
    }

    /// Creates a boolean schema.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean { coerce: false }
    }

    /// Creates an array schema.
    #[must_use]
    pub fn array(items: FieldSchema) -> Self {
        Self::Array {
            items: Box::new(items),
            min_items: None,
            max_items: None,
        }
    }

    /// Creates a schema accepting one of `values`.
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a schema that accepts any value.
    #[must_use]
    pub fn any() -> Self {
        Self::Any
    }

    /// Enables string coercion for integer, number and boolean schemas.
    ///
    /// On an array it applies to the items, so `?id=1&id=2` becomes `[1, 2]`.
    /// It is a no-op on kinds that already accept strings.
    #[must_use]
    pub fn coerce(self) -> Self {
        match self {
            Self::Integer {
                minimum, maximum, ..
            } => Self::Integer {
                minimum,
                maximum,
                coerce: true,
            },
            Self::Number {
                minimum, maximum, ..
            } => Self::Number {
                minimum,
                maximum,
                coerce: true,
            },
            Self::Boolean { .. } => Self::Boolean { coerce: true },
            Self::Array {
                items,
                min_items,
                max_items,
            } => Self::Array {
                items: Box::new(items.coerce()),
                min_items,
                max_items,
            },
            // Path and query values already arrive as strings.
            other @ (Self::String { .. }
            | Self::Enum { .. }
            | Self::Any
            | Self::Misdeclared { .. }) => other,
        }
    }

    /// Sets the minimum length for string schemas.
    #[must_use]
    pub fn min_length(self, len: usize) -> Self {
        match self {
            Self::String {
                max_length,
                pattern,
                ..
            } => Self::String {
                min_length: Some(len),
                max_length,
                pattern,
            },
            other => other.misapplied("min_length"),
        }
    }

    /// Sets the maximum length for string schemas.
    #[must_use]
    pub fn max_length(self, len: usize) -> Self {
        match self {
            Self::String {
                min_length,
                pattern,
                ..
            } => Self::String {
                min_length,
                max_length: Some(len),
                pattern,
            },
            other => other.misapplied("max_length"),
        }
    }

    /// Sets the pattern for string schemas.
    #[must_use]
    pub fn pattern(self, regex: Regex) -> Self {
        match self {
            Self::String {
                min_length,
                max_length,
                ..
            } => Self::String {
                min_length,
                max_length,
                pattern: Some(regex),
            },
            other => other.misapplied("pattern"),
        }
    }

    /// Sets the minimum value for integer and number schemas.
    #[must_use]
    pub fn minimum(self, min: i64) -> Self {
        match self {
            Self::Integer {
                maximum, coerce, ..
            } => Self::Integer {
                minimum: Some(min),
                maximum,
                coerce,
            },
            Self::Number {
                maximum, coerce, ..
            } => Self::Number {
                minimum: Some(min as f64),
                maximum,
                coerce,
            },
            other => other.misapplied("minimum"),
        }
    }

    /// Sets the maximum value for integer and number schemas.
    #[must_use]
    pub fn maximum(self, max: i64) -> Self {
        match self {
            Self::Integer {
                minimum, coerce, ..
            } => Self::Integer {
                minimum,
                maximum: Some(max),
                coerce,
            },
            Self::Number {
                minimum, coerce, ..
            } => Self::Number {
                minimum,
                maximum: Some(max as f64),
                coerce,
            },
            other => other.misapplied("maximum"),
        }
    }

    /// Sets a fractional minimum for number schemas.
    #[must_use]
    pub fn minimum_f64(self, min: f64) -> Self {
        match self {
            Self::Number {
                maximum, coerce, ..
            } => Self::Number {
                minimum: Some(min),
                maximum,
                coerce,
            },
            other => other.misapplied("minimum_f64"),
        }
    }

    /// Sets a fractional maximum for number schemas.
    #[must_use]
    pub fn maximum_f64(self, max: f64) -> Self {
        match self {
            Self::Number {
                minimum, coerce, ..
            } => Self::Number {
                minimum,
                maximum: Some(max),
                coerce,
            },
            other => other.misapplied("maximum_f64"),
        }
    }

    /// Sets the minimum items for array schemas.
    #[must_use]
    pub fn min_items(self, min: usize) -> Self {
        match self {
            Self::Array {
                items, max_items, ..
            } => Self::Array {
                items,
                min_items: Some(min),
                max_items,
            },
            other => other.misapplied("min_items"),
        }
    }

    /// Sets the maximum items for array schemas.
    #[must_use]
    pub fn max_items(self, max: usize) -> Self {
        match self {
            Self::Array {
                items, min_items, ..
            } => Self::Array {
                items,
                min_items,
                max_items: Some(max),
            },
            other => other.misapplied("max_items"),
        }
    }

    fn misapplied(self, modifier: &str) -> Self {
        match self {
            misdeclared @ Self::Misdeclared { .. } => misdeclared,
            other => Self::Misdeclared {
                reason: format!("`{modifier}` does not apply to {}", other.kind()),
            },
        }
    }

    /// Returns why this schema is misdeclared, if it is.
    #[must_use]
    pub fn misdeclaration(&self) -> Option<&str> {
        match self {
            Self::Misdeclared { reason } => Some(reason.as_str()),
            Self::Array { items, .. } => items.misdeclaration(),
            _ => None,
        }
    }

    /// Validates synchronously, collecting every issue.
    ///
    /// This is what the [`Schema`] implementation runs; it is exposed for
    /// callers that do not need an async context.
    pub fn check(&self, value: Value) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        let mut path = Vec::new();
        match self.check_at(value, &mut path, &mut issues) {
            Some(output) if issues.is_empty() => Ok(output),
            _ => Err(ValidationError::new(issues)),
        }
    }

    fn check_at(&self, value: Value, path: &mut Vec<String>, issues: &mut Vec<Issue>) -> Option<Value> {
        match self {
            Self::String {
                min_length,
                max_length,
                pattern,
            } => {
                let s = match value {
                    Value::String(s) => s,
                    other => {
                        issues.push(type_issue(path, "string", &other));
                        return None;
                    }
                };

                let len = s.chars().count();
                let before = issues.len();
                if let Some(min) = min_length {
                    if len < *min {
                        issues.push(Issue::at(
                            path.clone(),
                            IssueCode::TooSmall,
                            format!("String must contain at least {min} character(s)"),
                        ));
                    }
                }
                if let Some(max) = max_length {
                    if len > *max {
                        issues.push(Issue::at(
                            path.clone(),
                            IssueCode::TooBig,
                            format!("String must contain at most {max} character(s)"),
                        ));
                    }
                }
                if let Some(regex) = pattern {
                    if !regex.is_match(&s) {
                        issues.push(Issue::at(
                            path.clone(),
                            IssueCode::InvalidString,
                            format!("String must match pattern {}", regex.as_str()),
                        ));
                    }
                }

                (issues.len() == before).then_some(Value::String(s))
            }

            Self::Integer {
                minimum,
                maximum,
                coerce,
            } => {
                let n = match &value {
                    Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
                    Value::String(s) if *coerce => {
                        let s = s.trim();
                        s.parse::<i64>()
                            .ok()
                            .or_else(|| s.parse::<f64>().ok().and_then(whole))
                    }
                    _ => None,
                };
                let Some(n) = n else {
                    issues.push(type_issue(path, "integer", &value));
                    return None;
                };

                let before = issues.len();
                if let Some(min) = minimum {
                    if n < *min {
                        issues.push(too_small(path, *min));
                    }
                }
                if let Some(max) = maximum {
                    if n > *max {
                        issues.push(too_big(path, *max));
                    }
                }

                (issues.len() == before).then_some(Value::from(n))
            }

            Self::Number {
                minimum,
                maximum,
                coerce,
            } => {
                let n = match &value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) if *coerce => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
                    _ => None,
                };
                let Some(n) = n else {
                    issues.push(type_issue(path, "number", &value));
                    return None;
                };

                let before = issues.len();
                if let Some(min) = minimum {
                    if n < *min {
                        issues.push(too_small(path, min));
                    }
                }
                if let Some(max) = maximum {
                    if n > *max {
                        issues.push(too_big(path, max));
                    }
                }

                (issues.len() == before).then(|| number_value(n, value))
            }

            Self::Boolean { coerce } => {
                let b = match &value {
                    Value::Bool(b) => Some(*b),
                    Value::String(s) if *coerce => match s.trim().to_ascii_lowercase().as_str() {
                        "true" | "1" => Some(true),
                        "false" | "0" => Some(false),
                        _ => None,
                    },
                    _ => None,
                };
                if b.is_none() {
                    issues.push(type_issue(path, "boolean", &value));
                }
                b.map(Value::Bool)
            }

            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                let arr = match value {
                    Value::Array(arr) => arr,
                    other => {
                        issues.push(type_issue(path, "array", &other));
                        return None;
                    }
                };

                let before = issues.len();
                if let Some(min) = min_items {
                    if arr.len() < *min {
                        issues.push(Issue::at(
                            path.clone(),
                            IssueCode::TooSmall,
                            format!("Array must contain at least {min} element(s)"),
                        ));
                    }
                }
                if let Some(max) = max_items {
                    if arr.len() > *max {
                        issues.push(Issue::at(
                            path.clone(),
                            IssueCode::TooBig,
                            format!("Array must contain at most {max} element(s)"),
                        ));
                    }
                }

                let mut output = Vec::with_capacity(arr.len());
                for (idx, item) in arr.into_iter().enumerate() {
                    path.push(idx.to_string());
                    if let Some(item) = items.check_at(item, path, issues) {
                        output.push(item);
                    }
                    path.pop();
                }

                (issues.len() == before).then_some(Value::Array(output))
            }

            Self::Enum { values } => {
                let allowed = value
                    .as_str()
                    .is_some_and(|s| values.iter().any(|v| v == s));
                if allowed {
                    Some(value)
                } else {
                    issues.push(Issue::at(
                        path.clone(),
                        IssueCode::InvalidEnumValue,
                        format!(
                            "Invalid enum value. Expected {}",
                            values
                                .iter()
                                .map(|v| format!("'{v}'"))
                                .collect::<Vec<_>>()
                                .join(" | ")
                        ),
                    ));
                    None
                }
            }

            Self::Any => Some(value),

            Self::Misdeclared { reason } => {
                issues.push(Issue::at(
                    path.clone(),
                    IssueCode::Custom,
                    format!("Schema is misdeclared: {reason}"),
                ));
                None
            }
        }
    }
}

impl Schema for FieldSchema {
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        Box::pin(async move { self.check(input) })
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Integer { .. } => "integer",
            Self::Number { .. } => "number",
            Self::Boolean { .. } => "boolean",
            Self::Array { .. } => "array",
            Self::Enum { .. } => "enum",
            Self::Any => "any",
            Self::Misdeclared { .. } => "misdeclared",
        }
    }

    fn declaration_error(&self) -> Option<String> {
        self.misdeclaration().map(str::to_string)
    }
}

/// Returns a human-readable name for a JSON value type.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_issue(path: &[String], expected: &str, value: &Value) -> Issue {
    Issue::at(
        path.to_vec(),
        IssueCode::InvalidType,
        format!("Expected {expected}, received {}", value_type_name(value)),
    )
}

fn too_small(path: &[String], min: impl std::fmt::Display) -> Issue {
    Issue::at(
        path.to_vec(),
        IssueCode::TooSmall,
        format!("Number must be greater than or equal to {min}"),
    )
}

fn too_big(path: &[String], max: impl std::fmt::Display) -> Issue {
    Issue::at(
        path.to_vec(),
        IssueCode::TooBig,
        format!("Number must be less than or equal to {max}"),
    )
}

/// `20.0` counts as an integer; `20.5` and values beyond 2^53 do not.
fn whole(n: f64) -> Option<i64> {
    (n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER).then_some(n as i64)
}

/// Integral results are emitted as JSON integers so `"42"` becomes `42`.
fn number_value(n: f64, original: Value) -> Value {
    if let Value::Number(_) = original {
        return original;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}
