//! Construction-time errors.

use crate::Segment;
use thiserror::Error;

/// A malformed validation declaration.
///
/// These are programmer errors and are reported when a middleware is built,
/// never at request time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A field mapping contains an empty field name.
    #[error("{segment} declares a field with an empty name")]
    EmptyFieldName {
        /// The segment whose mapping is malformed.
        segment: Segment,
    },

    /// A field mapping names the same field twice.
    #[error("{segment} declares field '{field}' more than once")]
    DuplicateField {
        /// The segment whose mapping is malformed.
        segment: Segment,
        /// The repeated field name.
        field: String,
    },

    /// A schema was built with a modifier that does not fit its kind.
    #[error("{segment} schema is misdeclared: {reason}")]
    MisdeclaredSchema {
        /// The segment whose schema is misdeclared.
        segment: Segment,
        /// What was misapplied and where.
        reason: String,
    },

    /// A segment was declared more than once on the same builder.
    #[error("{segment} schema declared more than once")]
    SegmentDeclaredTwice {
        /// The segment declared twice.
        segment: Segment,
    },
}

impl ConfigurationError {
    /// Returns the segment the error refers to.
    #[must_use]
    pub const fn segment(&self) -> Segment {
        match self {
            Self::EmptyFieldName { segment }
            | Self::DuplicateField { segment, .. }
            | Self::MisdeclaredSchema { segment, .. }
            | Self::SegmentDeclaredTwice { segment } => *segment,
        }
    }
}
