//! Request segments.

use serde::{Deserialize, Serialize};

/// One of the three independently validated parts of a request.
///
/// The order of [`Segment::ALL`] is the order in which failures are reported.
///
/// # Example
///
/// ```
/// use kanon_core::Segment;
///
/// assert_eq!(Segment::ALL[0], Segment::Params);
/// assert_eq!(Segment::Query.to_string(), "query");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    /// Path parameters resolved by the router.
    Params,
    /// Query string parameters.
    Query,
    /// The already-parsed request body.
    Body,
}

impl Segment {
    /// All segments in validation and reporting order.
    pub const ALL: [Segment; 3] = [Segment::Params, Segment::Query, Segment::Body];

    /// Returns the wire name of this segment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Params => "params",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
