use pulse_types::{AlertId, AlertStatus, ClaimId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("verification error: {0}")]
    Verification(#[from] pulse_verification::VerificationError),

    #[error("claim {0} not found")]
    ClaimNotFound(ClaimId),

    #[error("claim {0} already registered")]
    DuplicateClaim(ClaimId),

    #[error("alert {0} not found")]
    AlertNotFound(AlertId),

    #[error("alert cannot move from {from:?} to {to:?}")]
    InvalidAlertTransition { from: AlertStatus, to: AlertStatus },

    #[error("validation failed: {0}")]
    Validation(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
