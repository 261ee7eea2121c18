//! Subscription topics and event types.

use pulse_types::{AreaId, Timestamp};
use serde::Serialize;
use std::fmt;

/// A named subscription scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Every event in the system.
    Global,
    /// Events scoped to one geographic area.
    Area(AreaId),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Area(id) => write!(f, "area:{id}"),
        }
    }
}

/// Event names emitted by the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CoreEvent {
    #[serde(rename = "claim:new")]
    ClaimNew,
    #[serde(rename = "claim:vote")]
    ClaimVote,
    #[serde(rename = "claim:status")]
    ClaimStatus,
    #[serde(rename = "alert:new")]
    AlertNew,
}

impl CoreEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClaimNew => "claim:new",
            Self::ClaimVote => "claim:vote",
            Self::ClaimStatus => "claim:status",
            Self::AlertNew => "alert:new",
        }
    }
}

impl fmt::Display for CoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event as delivered to subscribers.
#[derive(Clone, Debug, Serialize)]
pub struct BroadcastEvent {
    pub event: CoreEvent,
    pub payload: serde_json::Value,
    pub timestamp: Timestamp,
}
