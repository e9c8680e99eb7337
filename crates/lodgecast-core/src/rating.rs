//! The three-class rating label predicted for a listing.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Predicted quality class for a listing without review history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rating {
    Great,
    Average,
    Poor,
}

impl Rating {
    /// All ratings in declaration order. Declaration order is also the
    /// tie-break order for forest votes and count sorting.
    pub const ALL: [Rating; 3] = [Rating::Great, Rating::Average, Rating::Poor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Great => "Great",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A label string outside the closed {Great, Average, Poor} set.
#[derive(Debug, Error)]
#[error("unknown rating label: {0:?}")]
pub struct UnknownRating(pub String);

impl FromStr for Rating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Great" => Ok(Self::Great),
            "Average" => Ok(Self::Average),
            "Poor" => Ok(Self::Poor),
            other => Err(UnknownRating(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for rating in Rating::ALL {
            assert_eq!(rating.as_str().parse::<Rating>().unwrap(), rating);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "Mediocre".parse::<Rating>().unwrap_err();
        assert_eq!(err.0, "Mediocre");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Rating::Great.to_string(), "Great");
        assert_eq!(Rating::Poor.to_string(), "Poor");
    }
}
