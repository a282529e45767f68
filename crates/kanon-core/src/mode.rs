//! Normalization modes shared by the middleware and the configuration layer.

use serde::{Deserialize, Serialize};

/// How an object-shaped schema treats keys it does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectMode {
    /// Reject the whole object if it contains an undeclared key.
    Strict,
    /// Accept undeclared keys and drop them from the output.
    #[default]
    Lax,
}

impl std::str::FromStr for ObjectMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lax" => Ok(Self::Lax),
            other => Err(format!("expected 'strict' or 'lax', got '{other}'")),
        }
    }
}

/// What a segment with no declared schema accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingSchemaBehavior {
    /// Treat the segment as an empty strict object: any data is rejected.
    #[default]
    Strict,
    /// Pass the segment's data through unchanged.
    Any,
}

impl std::str::FromStr for MissingSchemaBehavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "any" => Ok(Self::Any),
            other => Err(format!("expected 'strict' or 'any', got '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ObjectMode::default(), ObjectMode::Lax);
        assert_eq!(MissingSchemaBehavior::default(), MissingSchemaBehavior::Strict);
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!("STRICT".parse::<ObjectMode>(), Ok(ObjectMode::Strict));
        assert_eq!("any".parse::<MissingSchemaBehavior>(), Ok(MissingSchemaBehavior::Any));
        assert!("loose".parse::<ObjectMode>().is_err());
    }
}
