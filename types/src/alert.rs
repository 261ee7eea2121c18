//! Alert model, delivery channels, and alert lifecycle states.

use crate::{AlertId, ClaimId, Severity, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A delivery surface for an alert.
///
/// `Dashboard` is implicit (served by the event broadcaster); `Email` and
/// `Sms` go through the external notification gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Dashboard,
    Email,
    Sms,
}

impl Channel {
    /// Whether delivery goes through the external notification gateway.
    pub fn is_external(&self) -> bool {
        matches!(self, Self::Email | Self::Sms)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Email => "email",
            Self::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The delivery lifecycle state of an alert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertStatus {
    /// Created, dispatch not yet completed.
    Pending,
    /// All channel sends have been attempted (best-effort, no per-channel
    /// delivery status is tracked).
    Sent,
    /// An operator acknowledged the alert.
    Acknowledged,
    /// The alert was closed out. Terminal.
    Resolved,
}

/// An alert produced by a matched rule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub source_claim_id: ClaimId,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub channels: BTreeSet<Channel>,
    pub status: AlertStatus,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
    pub acknowledged_at: Option<Timestamp>,
    pub resolved_at: Option<Timestamp>,
}

impl Alert {
    /// A fresh alert in `Pending`, not yet dispatched.
    pub fn new(
        id: AlertId,
        source_claim_id: ClaimId,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        channels: BTreeSet<Channel>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            source_claim_id,
            severity,
            title: title.into(),
            message: message.into(),
            channels,
            status: AlertStatus::Pending,
            created_at,
            sent_at: None,
            acknowledged_at: None,
            resolved_at: None,
        }
    }

    /// Channels that require an external send (email/SMS).
    pub fn external_channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.channels.iter().copied().filter(Channel::is_external)
    }
}
