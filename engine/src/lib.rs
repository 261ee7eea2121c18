//! The CivicPulse core service.
//!
//! `CivicEngine` is the explicitly constructed instance that wires the
//! verification ledger, the alert engine, and the event broadcaster
//! together:
//! - A vote updates the claim's trust score, may trigger an automatic
//!   lifecycle transition, and is broadcast.
//! - A newly recorded incident/prediction event is evaluated against the
//!   alert rules; a generated alert is broadcast and dispatched to its
//!   external channels fire-and-forget.
//!
//! All state is in-process and owned by the instance — there are no
//! globals. Init is `CivicEngine::new`; `CivicEngine::shutdown` flips a
//! stop flag that the cooldown sweep watches.

pub mod config;
pub mod core;
pub mod error;
pub mod store;

pub use config::EngineConfig;
pub use core::{CivicEngine, IngestOutcome};
pub use error::EngineError;
pub use store::ClaimStore;
