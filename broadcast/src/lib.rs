//! Topic-based event broadcaster for real-time clients.
//!
//! Clients can subscribe to:
//! - The global feed (every event)
//! - A per-area feed (events scoped to one area)
//!
//! Delivery is at-most-once and lossy: publishing never blocks the caller
//! and never fails the triggering operation; subscribers that join late see
//! nothing from before they joined.

pub mod broadcaster;
pub mod topics;

pub use broadcaster::EventBroadcaster;
pub use topics::{BroadcastEvent, CoreEvent, Topic};
