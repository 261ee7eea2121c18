//! Vote types and weight computation.

use pulse_types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight contributed by a `yes` vote.
pub const WEIGHT_YES: f64 = 0.25;
/// Weight contributed by a `no` vote (negative).
pub const WEIGHT_NO: f64 = -0.30;
/// Weight contributed by a `partial` vote.
pub const WEIGHT_PARTIAL: f64 = 0.15;
/// Bonus for photographic evidence on a confirming or partial vote.
pub const WEIGHT_PHOTO_BONUS: f64 = 0.30;

/// A citizen's response to a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteResponse {
    /// The claim is accurate.
    Yes,
    /// The claim is not accurate.
    No,
    /// Partially accurate (e.g. right issue, wrong spot).
    Partial,
}

impl fmt::Display for VoteResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Partial => "partial",
        };
        f.write_str(s)
    }
}

/// Compute the weight of a vote at submission time.
///
/// Photo evidence only strengthens confirming votes; a `no` with a photo
/// carries no bonus (the photo disputes, it does not corroborate).
pub fn vote_weight(response: VoteResponse, has_photo: bool) -> f64 {
    let base = match response {
        VoteResponse::Yes => WEIGHT_YES,
        VoteResponse::No => WEIGHT_NO,
        VoteResponse::Partial => WEIGHT_PARTIAL,
    };
    if has_photo && response != VoteResponse::No {
        base + WEIGHT_PHOTO_BONUS
    } else {
        base
    }
}

/// One recorded vote — the audit trail entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VoteRecord {
    pub user: UserId,
    pub response: VoteResponse,
    pub has_photo: bool,
    /// Weight as computed at submission time (weights may be retuned later;
    /// the record keeps what was actually applied).
    pub weight: f64,
    pub timestamp: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_weights() {
        assert_eq!(vote_weight(VoteResponse::Yes, false), 0.25);
        assert_eq!(vote_weight(VoteResponse::No, false), -0.30);
        assert_eq!(vote_weight(VoteResponse::Partial, false), 0.15);
    }

    #[test]
    fn photo_bonus_applies_to_confirming_votes() {
        assert!((vote_weight(VoteResponse::Yes, true) - 0.55).abs() < 1e-9);
        assert!((vote_weight(VoteResponse::Partial, true) - 0.45).abs() < 1e-9);
    }

    #[test]
    fn photo_bonus_skipped_for_no() {
        assert_eq!(vote_weight(VoteResponse::No, true), -0.30);
    }
}
