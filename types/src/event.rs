//! Civic event type vocabulary.
//!
//! Matches the categories the upstream text classifier produces. Anything
//! it cannot place lands in `Other`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The category of a civic incident or prediction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    /// Congestion, jams, blocked roads.
    Traffic,
    /// Waste accumulation, overflowing bins.
    Garbage,
    /// Waterlogging, flooding, drainage failures.
    Water,
    /// Streetlight and electrical faults.
    Light,
    /// Anything the classifier could not place.
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Garbage => "garbage",
            Self::Water => "water",
            Self::Light => "light",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "traffic" => Ok(Self::Traffic),
            "garbage" => Ok(Self::Garbage),
            "water" => Ok(Self::Water),
            "light" => Ok(Self::Light),
            "other" => Ok(Self::Other),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

/// Error for an unrecognized event type string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_known_types() {
        for ty in [
            EventType::Traffic,
            EventType::Garbage,
            EventType::Water,
            EventType::Light,
            EventType::Other,
        ] {
            assert_eq!(ty.as_str().parse::<EventType>().unwrap(), ty);
        }
    }

    #[test]
    fn unknown_type_is_an_error() {
        let err = "earthquake".parse::<EventType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event type: earthquake");
    }
}
