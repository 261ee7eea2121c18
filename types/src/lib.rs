//! Fundamental types for the CivicPulse core.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: ids, timestamps, bounded scores, claim and alert models, and
//! the event/severity vocabularies.

pub mod alert;
pub mod claim;
pub mod event;
pub mod id;
pub mod score;
pub mod severity;
pub mod time;

pub use alert::{Alert, AlertStatus, Channel};
pub use claim::{Claim, ClaimKind, ClaimStatus, Location};
pub use event::EventType;
pub use id::{AlertId, AreaId, ClaimId, RuleId, UserId};
pub use score::Score;
pub use severity::Severity;
pub use time::Timestamp;
