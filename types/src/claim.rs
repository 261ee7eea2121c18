//! Claim model and lifecycle states.
//!
//! A claim is either a citizen-reported incident or an AI-generated risk
//! prediction; both go through the same community verification lifecycle.

use crate::{AreaId, ClaimId, EventType, Score, Timestamp};
use serde::{Deserialize, Serialize};

/// What kind of submission this claim originated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimKind {
    /// A citizen-reported incident.
    Incident,
    /// An AI-generated risk prediction.
    Prediction,
}

/// The verification lifecycle state of a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimStatus {
    /// Awaiting community feedback; automatic transitions are live.
    Pending,
    /// Community trust reached the verify threshold.
    Verified,
    /// Community trust fell to the reject threshold, or an admin rejected.
    Rejected,
    /// An admin approved the claim for action.
    Approved,
    /// The underlying issue was resolved. Terminal.
    Resolved,
}

impl ClaimStatus {
    /// Whether any further transition (automatic or admin) is possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Resolved)
    }

    /// Whether score-driven transitions may still fire.
    pub fn accepts_automatic_transitions(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// A geographic point, WGS84.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// An incident report or AI prediction undergoing community verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub kind: ClaimKind,
    pub event_type: EventType,
    pub area_id: AreaId,
    pub area_name: String,
    pub location: Location,
    /// Reported severity (incidents) or model confidence (predictions).
    pub probability: Score,
    pub status: ClaimStatus,
    /// Accumulated community trust, clamped to [0, 1].
    pub verification_score: Score,
    /// Total votes recorded, including post-decision audit votes.
    pub verification_count: u32,
    pub created_at: Timestamp,
    pub status_changed_at: Timestamp,
}

impl Claim {
    /// A fresh claim in `Pending` at the neutral verification baseline.
    ///
    /// Starting at [`Score::NEUTRAL`] keeps a new claim equidistant from
    /// both thresholds, so the first vote can push it toward either
    /// decision without landing on the reject bound.
    pub fn new(
        id: ClaimId,
        kind: ClaimKind,
        event_type: EventType,
        area_id: AreaId,
        area_name: impl Into<String>,
        location: Location,
        probability: Score,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            kind,
            event_type,
            area_id,
            area_name: area_name.into(),
            location,
            probability,
            status: ClaimStatus::Pending,
            verification_score: Score::NEUTRAL,
            verification_count: 0,
            created_at,
            status_changed_at: created_at,
        }
    }

    /// Record a status change, stamping `status_changed_at`.
    pub fn set_status(&mut self, status: ClaimStatus, now: Timestamp) {
        self.status = status;
        self.status_changed_at = now;
    }
}
