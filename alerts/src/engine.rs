//! The alert engine — rule matching plus cooldown gating.

use pulse_types::{Alert, AlertId, Timestamp};
use pulse_utils::format_duration;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use crate::cooldown::{CooldownCache, CooldownDecision, CooldownKey, COOLDOWN_WINDOW_SECS};
use crate::rules::{ClaimEvent, RuleSet};

/// Outcome of evaluating one event.
#[derive(Debug)]
pub enum Evaluation {
    /// No enabled rule matched.
    NoMatch,
    /// A rule matched but a recent alert for the same (area, type) exists.
    /// Not an error — a normal, logged outcome.
    Suppressed { remaining_secs: u64 },
    /// An alert was generated (cooldown stamped).
    Fired(Alert),
}

impl Evaluation {
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Self::Fired(alert) => Some(alert),
            _ => None,
        }
    }
}

/// Matches events against the rule set, consulting the cooldown cache.
pub struct AlertEngine {
    rules: RuleSet,
    cooldown: CooldownCache,
    window_secs: u64,
    next_alert_id: AtomicU64,
}

impl AlertEngine {
    pub fn new(rules: RuleSet, window_secs: u64) -> Self {
        Self {
            rules,
            cooldown: CooldownCache::new(),
            window_secs,
            next_alert_id: AtomicU64::new(1),
        }
    }

    pub fn with_standard_rules() -> Self {
        Self::new(RuleSet::standard(), COOLDOWN_WINDOW_SECS)
    }

    /// Evaluate one incoming event. Produces at most one alert.
    pub fn evaluate(&self, event: &ClaimEvent, now: Timestamp) -> Evaluation {
        let Some(rule) = self.rules.best_match(event) else {
            debug!(claim = %event.claim_id, event_type = %event.event_type, "no rule matched");
            return Evaluation::NoMatch;
        };

        let key = CooldownKey {
            area: event.area_id,
            event_type: event.event_type,
        };
        if let CooldownDecision::Suppress { remaining_secs } =
            self.cooldown.check_and_record(key, now, self.window_secs)
        {
            info!(
                area = %event.area_name,
                event_type = %event.event_type,
                rule = %rule.name,
                remaining = %format_duration(remaining_secs),
                "alert suppressed by cooldown"
            );
            return Evaluation::Suppressed { remaining_secs };
        }

        let id = AlertId::new(self.next_alert_id.fetch_add(1, Ordering::Relaxed));
        let alert = Alert::new(
            id,
            event.claim_id,
            rule.severity,
            format!("{}: {}", rule.name, event.area_name),
            rule.render_message(event),
            rule.channels.clone(),
            now,
        );
        info!(
            alert = %alert.id,
            severity = %alert.severity,
            area = %event.area_name,
            rule = %rule.name,
            "alert generated"
        );
        Evaluation::Fired(alert)
    }

    /// Drop cooldown entries older than the window.
    pub fn sweep_cooldowns(&self, now: Timestamp) -> usize {
        self.cooldown.sweep(now, self.window_secs)
    }

    pub fn cooldown_entries(&self) -> usize {
        self.cooldown.len()
    }
}
