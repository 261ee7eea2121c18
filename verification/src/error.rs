use pulse_types::ClaimStatus;
use thiserror::Error;

use crate::admin::AdminAction;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("user {0} has already voted on this claim")]
    DuplicateVote(String),

    #[error("cannot {action} a claim in status {from:?}")]
    InvalidTransition {
        from: ClaimStatus,
        action: AdminAction,
    },

    #[error("missing required field: {0}")]
    MissingField(&'static str),
}
