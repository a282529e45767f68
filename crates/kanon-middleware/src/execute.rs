//! Segment validation and result aggregation.
//!
//! [`execute`] runs the three compiled segment schemas against their inputs
//! and records every outcome. [`SegmentOutcomes::into_validated`] then
//! decides between the two possible results: all segments passed, in which
//! case [`ValidatedSegments::apply`] writes the coerced values back, or at
//! least one failed, in which case the ordered failures are returned and the
//! request data is left untouched.

use crate::compile::CompiledSegments;
use kanon_core::{RequestSegments, Schema, Segment, SegmentFailure, ValidationError};
use serde_json::Value;

/// The raw input of each segment, copied out of the request.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentInputs {
    /// Path parameter input.
    pub params: Value,
    /// Query string input.
    pub query: Value,
    /// Body input.
    pub body: Value,
}

impl SegmentInputs {
    /// Reads the inputs from `segments`. Absent segments become `{}`.
    #[must_use]
    pub fn from_segments(segments: &RequestSegments) -> Self {
        Self {
            params: segments.input(Segment::Params),
            query: segments.input(Segment::Query),
            body: segments.input(Segment::Body),
        }
    }
}

type Outcome = Result<Value, ValidationError>;

/// The outcome of validating each segment, kept in segment order.
#[derive(Debug)]
pub struct SegmentOutcomes {
    params: Outcome,
    query: Outcome,
    body: Outcome,
}

/// Coerced values of all three segments.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSegments {
    /// Coerced path parameters.
    pub params: Value,
    /// Coerced query.
    pub query: Value,
    /// Coerced body.
    pub body: Value,
}

/// Validates every segment.
///
/// The three schemas are driven concurrently and each one is awaited to
/// completion; a failure in one segment does not stop the others.
pub async fn execute(compiled: &CompiledSegments, inputs: SegmentInputs) -> SegmentOutcomes {
    let (params, query, body) = tokio::join!(
        compiled.params.validate(inputs.params),
        compiled.query.validate(inputs.query),
        compiled.body.validate(inputs.body),
    );

    SegmentOutcomes {
        params,
        query,
        body,
    }
}

impl SegmentOutcomes {
    /// Returns the outcome recorded for `segment`.
    #[must_use]
    pub fn get(&self, segment: Segment) -> &Result<Value, ValidationError> {
        match segment {
            Segment::Params => &self.params,
            Segment::Query => &self.query,
            Segment::Body => &self.body,
        }
    }

    /// Returns `true` if every segment passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.params.is_ok() && self.query.is_ok() && self.body.is_ok()
    }

    /// Aggregates the outcomes.
    ///
    /// # Errors
    ///
    /// Returns the failures, ordered params, query, body, if any segment
    /// failed.
    pub fn into_validated(self) -> Result<ValidatedSegments, Vec<SegmentFailure>> {
        match (self.params, self.query, self.body) {
            (Ok(params), Ok(query), Ok(body)) => Ok(ValidatedSegments {
                params,
                query,
                body,
            }),
            (params, query, body) => {
                let failures = [
                    (Segment::Params, params),
                    (Segment::Query, query),
                    (Segment::Body, body),
                ]
                .into_iter()
                .filter_map(|(segment, outcome)| {
                    outcome.err().map(|err| SegmentFailure::new(segment, err))
                })
                .collect();
                Err(failures)
            }
        }
    }
}

impl ValidatedSegments {
    /// Overwrites all three segments with the coerced values.
    pub fn apply(self, segments: &mut RequestSegments) {
        segments.params = self.params;
        segments.query = self.query;
        segments.body = self.body;
    }
}
