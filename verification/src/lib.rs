//! Community verification of civic claims.
//!
//! Two mechanisms drive a claim's lifecycle:
//! 1. **Weighted votes**: citizens confirm or dispute a claim; accumulated
//!    weights produce a bounded trust score that can automatically verify
//!    or reject a claim while it is still `Pending`.
//! 2. **Admin actions**: operators approve, reject, or resolve claims
//!    subject to a legality matrix.
//!
//! Automatic evaluation freezes once a claim leaves `Pending` — later votes
//! are recorded for audit but never move the status again. This crate is
//! pure domain logic over `&mut Claim`; locking and storage belong to the
//! engine.

pub mod admin;
pub mod error;
pub mod ledger;
pub mod vote;

pub use admin::{apply_admin_action, AdminAction, AdminRecord};
pub use error::VerificationError;
pub use ledger::{cast_vote, ClaimVotes, VoteOutcome, REJECT_THRESHOLD, VERIFY_THRESHOLD};
pub use vote::{vote_weight, VoteRecord, VoteResponse};
