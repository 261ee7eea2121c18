//! The verification ledger — weighted votes and automatic transitions.

use pulse_types::{Claim, ClaimStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

use crate::error::VerificationError;
use crate::vote::{vote_weight, VoteRecord, VoteResponse};

/// Score at or above which a `Pending` claim becomes `Verified`.
pub const VERIFY_THRESHOLD: f64 = 0.75;
/// Score at or below which a `Pending` claim becomes `Rejected`.
pub const REJECT_THRESHOLD: f64 = 0.25;

/// The per-claim vote history: the audit trail plus a voter index for
/// duplicate detection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ClaimVotes {
    records: Vec<VoteRecord>,
    voters: HashSet<UserId>,
}

impl ClaimVotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, user: &UserId) -> bool {
        self.voters.contains(user)
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The result of casting a vote.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoteOutcome {
    pub new_score: f64,
    pub status: ClaimStatus,
    /// Set when this vote triggered an automatic transition.
    pub transitioned: Option<ClaimStatus>,
}

/// Cast one vote on a claim.
///
/// Rejects duplicates before any mutation. On success the weight is
/// clamp-added to the claim's verification score, the vote is recorded, and
/// — only while the claim is still `Pending` — the dual thresholds are
/// evaluated for an automatic transition. A claim that has left `Pending`
/// keeps accumulating score and count for audit, but its status never moves
/// automatically again.
pub fn cast_vote(
    claim: &mut Claim,
    votes: &mut ClaimVotes,
    user: UserId,
    response: VoteResponse,
    has_photo: bool,
    now: Timestamp,
) -> Result<VoteOutcome, VerificationError> {
    if votes.has_voted(&user) {
        return Err(VerificationError::DuplicateVote(user.to_string()));
    }

    let weight = vote_weight(response, has_photo);
    claim.verification_score = claim.verification_score.add_weight(weight);
    claim.verification_count += 1;
    votes.records.push(VoteRecord {
        user: user.clone(),
        response,
        has_photo,
        weight,
        timestamp: now,
    });
    votes.voters.insert(user);

    let transitioned = if claim.status.accepts_automatic_transitions() {
        evaluate_thresholds(claim, now)
    } else {
        None
    };

    debug!(
        claim = %claim.id,
        score = claim.verification_score.value(),
        count = claim.verification_count,
        ?transitioned,
        "vote recorded"
    );

    Ok(VoteOutcome {
        new_score: claim.verification_score.value(),
        status: claim.status,
        transitioned,
    })
}

/// Evaluate the dual thresholds for a `Pending` claim.
fn evaluate_thresholds(claim: &mut Claim, now: Timestamp) -> Option<ClaimStatus> {
    let score = claim.verification_score;
    let next = if score.at_least(VERIFY_THRESHOLD) {
        ClaimStatus::Verified
    } else if score.at_most(REJECT_THRESHOLD) {
        ClaimStatus::Rejected
    } else {
        return None;
    };
    claim.set_status(next, now);
    Some(next)
}
