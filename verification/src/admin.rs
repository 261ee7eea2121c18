//! Admin actions on claims.
//!
//! Legality matrix:
//! - `Approve`: from `Pending` only.
//! - `Reject`: from `Pending`, or from `Verified` as an override of the
//!   community decision.
//! - `Resolve`: from `Approved` or `Verified`.
//!
//! Everything else is an `InvalidTransition` and leaves the claim untouched.

use pulse_types::{Claim, ClaimStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::info;

use crate::error::VerificationError;

/// An operator's decision on a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminAction {
    Approve,
    Reject,
    Resolve,
}

impl AdminAction {
    fn target_status(&self) -> ClaimStatus {
        match self {
            Self::Approve => ClaimStatus::Approved,
            Self::Reject => ClaimStatus::Rejected,
            Self::Resolve => ClaimStatus::Resolved,
        }
    }

    fn legal_from(&self, from: ClaimStatus) -> bool {
        match self {
            Self::Approve => matches!(from, ClaimStatus::Pending),
            Self::Reject => matches!(from, ClaimStatus::Pending | ClaimStatus::Verified),
            Self::Resolve => matches!(from, ClaimStatus::Approved | ClaimStatus::Verified),
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Resolve => "resolve",
        };
        f.write_str(s)
    }
}

/// Audit record of an admin action.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminRecord {
    pub admin: UserId,
    pub action: AdminAction,
    pub notes: Option<String>,
    pub timestamp: Timestamp,
}

/// Apply an admin action to a claim.
///
/// On success the claim's status moves and an [`AdminRecord`] is returned
/// for the caller to append to the claim's audit log. An illegal action
/// mutates nothing.
pub fn apply_admin_action(
    claim: &mut Claim,
    action: AdminAction,
    admin: UserId,
    notes: Option<String>,
    now: Timestamp,
) -> Result<AdminRecord, VerificationError> {
    if !action.legal_from(claim.status) {
        return Err(VerificationError::InvalidTransition {
            from: claim.status,
            action,
        });
    }

    claim.set_status(action.target_status(), now);
    info!(claim = %claim.id, %action, admin = %admin, "admin action applied");

    Ok(AdminRecord {
        admin,
        action,
        notes,
        timestamp: now,
    })
}
