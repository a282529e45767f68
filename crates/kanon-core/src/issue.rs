//! Structured validation failures.
//!
//! A schema reports every problem it finds as an [`Issue`]. Issues for one
//! value are carried by a [`ValidationError`], and the middleware pairs a
//! segment's error with the [`Segment`] it came from to form a
//! [`SegmentFailure`].

use crate::Segment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable category of an [`Issue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The value has the wrong type, or a required value is missing.
    InvalidType,
    /// The value is below a length, size or numeric minimum.
    TooSmall,
    /// The value is above a length, size or numeric maximum.
    TooBig,
    /// The string does not match the declared pattern.
    InvalidString,
    /// The value is not one of the allowed options.
    InvalidEnumValue,
    /// A strict object received keys it does not declare.
    UnrecognizedKeys,
    /// A refinement rejected the value.
    Custom,
}

impl IssueCode {
    /// Returns the wire name of this code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::InvalidString => "invalid_string",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::UnrecognizedKeys => "unrecognized_keys",
            Self::Custom => "custom",
        }
    }
}

/// A single field-level problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Path from the segment root to the offending value. Array indices are
    /// rendered as decimal strings.
    pub path: Vec<String>,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable code.
    pub code: IssueCode,
}

impl Issue {
    /// Creates an issue at the root of the validated value.
    pub fn new(code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path: Vec::new(),
            message: message.into(),
            code,
        }
    }

    /// Creates an issue at the given path.
    pub fn at(path: Vec<String>, code: IssueCode, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            code,
        }
    }

    /// Creates a `custom` issue, as produced by refinements.
    pub fn custom(message: impl Into<String>) -> Self {
        Self::new(IssueCode::Custom, message)
    }

    /// Prepends a path component.
    #[must_use]
    pub fn prefixed(mut self, key: &str) -> Self {
        self.path.insert(0, key.to_string());
        self
    }
}

/// All issues found while validating one value.
///
/// Never empty when produced by the schemas in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed with {} issue(s)", .issues.len())]
pub struct ValidationError {
    /// The collected issues, in discovery order.
    pub issues: Vec<Issue>,
}

impl ValidationError {
    /// Creates an error from a list of issues.
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Creates an error holding a single issue.
    pub fn single(issue: Issue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// Prepends `key` to the path of every issue.
    #[must_use]
    pub fn prefixed(self, key: &str) -> Self {
        Self {
            issues: self
                .issues
                .into_iter()
                .map(|issue| issue.prefixed(key))
                .collect(),
        }
    }
}

impl From<Issue> for ValidationError {
    fn from(issue: Issue) -> Self {
        Self::single(issue)
    }
}

/// The failure of one request segment.
///
/// Serializes to the wire shape of the default failure response:
///
/// ```json
/// { "type": "query", "errors": [{ "path": ["age"], "message": "...", "code": "too_small" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentFailure {
    /// The segment that failed.
    #[serde(rename = "type")]
    pub segment: Segment,
    /// Field-level issues for that segment.
    #[serde(rename = "errors")]
    pub issues: Vec<Issue>,
}

impl SegmentFailure {
    /// Pairs a segment with the error its schema produced.
    pub fn new(segment: Segment, error: ValidationError) -> Self {
        Self {
            segment,
            issues: error.issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefixed_paths() {
        let error = ValidationError::new(vec![
            Issue::new(IssueCode::InvalidType, "Required"),
            Issue::at(vec!["0".to_string()], IssueCode::TooSmall, "too short"),
        ])
        .prefixed("tags");

        assert_eq!(error.issues[0].path, vec!["tags"]);
        assert_eq!(error.issues[1].path, vec!["tags", "0"]);
    }

    #[test]
    fn test_error_display_counts_issues() {
        let error = ValidationError::single(Issue::custom("taken"));
        assert_eq!(error.to_string(), "validation failed with 1 issue(s)");
    }

    #[test]
    fn test_segment_failure_wire_shape() {
        let failure = SegmentFailure::new(
            Segment::Query,
            ValidationError::single(Issue::at(
                vec!["age".to_string()],
                IssueCode::TooSmall,
                "Number must be greater than or equal to 18",
            )),
        );

        let expected = json!({
            "type": "query",
            "errors": [{
                "path": ["age"],
                "message": "Number must be greater than or equal to 18",
                "code": "too_small"
            }]
        });

        assert_eq!(serde_json::to_value(&failure).unwrap(), expected);
    }
}
