//! Alert generation for incoming civic events.
//!
//! An incoming incident/prediction event is matched against a static rule
//! set; the single highest-priority match (if any) produces an alert,
//! subject to a per-(area, event type) cooldown that suppresses duplicates
//! within a 30-minute window. Generated alerts are fanned out to their
//! external channels by the notification dispatcher, best-effort with a
//! bounded per-send timeout and no retry.

pub mod cooldown;
pub mod dispatch;
pub mod engine;
pub mod rules;

pub use cooldown::{CooldownCache, CooldownDecision, CooldownKey, COOLDOWN_WINDOW_SECS};
pub use dispatch::{
    DispatchReport, NotificationDispatcher, NotificationPayload, NotificationSender, SendError,
    SendFuture, DEFAULT_SEND_TIMEOUT_SECS,
};
pub use engine::{AlertEngine, Evaluation};
pub use rules::{AlertRule, ClaimEvent, RuleSet};
