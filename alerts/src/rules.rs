//! Alert rules and rule matching.

use pulse_types::{AreaId, Channel, ClaimId, EventType, RuleId, Score, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An incoming event to evaluate: a newly recorded incident or prediction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClaimEvent {
    pub claim_id: ClaimId,
    pub event_type: EventType,
    pub probability: Score,
    pub area_id: AreaId,
    pub area_name: String,
}

/// A static policy mapping an event's type/probability to an alert.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: RuleId,
    pub name: String,
    /// When set, the rule only matches events of this type.
    pub event_type: Option<EventType>,
    pub min_probability: Score,
    pub severity: Severity,
    pub channels: BTreeSet<Channel>,
    /// Template with `{event_type}`, `{area_name}`, `{probability}`
    /// placeholders.
    pub message_template: String,
    pub enabled: bool,
}

impl AlertRule {
    /// Whether this rule matches the event.
    pub fn matches(&self, event: &ClaimEvent) -> bool {
        if !self.enabled {
            return false;
        }
        if event.probability < self.min_probability {
            return false;
        }
        match self.event_type {
            Some(ty) => ty == event.event_type,
            None => true,
        }
    }

    /// Render the message template for an event.
    pub fn render_message(&self, event: &ClaimEvent) -> String {
        self.message_template
            .replace("{event_type}", event.event_type.as_str())
            .replace("{area_name}", &event.area_name)
            .replace("{probability}", &event.probability.as_percent())
    }
}

/// The ordered set of alert rules.
///
/// Order is authoring order; it only matters as the tie-breaker when two
/// matching rules share a severity.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<AlertRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<AlertRule>) -> Self {
        Self { rules }
    }

    /// The standing policy table mirrored from the operations dashboard.
    pub fn standard() -> Self {
        fn channels(list: &[Channel]) -> BTreeSet<Channel> {
            list.iter().copied().collect()
        }

        Self::new(vec![
            AlertRule {
                id: RuleId::new(1),
                name: "Critical risk".to_string(),
                event_type: None,
                min_probability: Score::new(0.9),
                severity: Severity::Critical,
                channels: channels(&[Channel::Dashboard, Channel::Email, Channel::Sms]),
                message_template:
                    "CRITICAL: {event_type} risk in {area_name} ({probability} probability)"
                        .to_string(),
                enabled: true,
            },
            AlertRule {
                id: RuleId::new(2),
                name: "High traffic risk".to_string(),
                event_type: Some(EventType::Traffic),
                min_probability: Score::new(0.75),
                severity: Severity::High,
                channels: channels(&[Channel::Dashboard, Channel::Sms]),
                message_template: "Heavy traffic expected in {area_name} ({probability})"
                    .to_string(),
                enabled: true,
            },
            AlertRule {
                id: RuleId::new(3),
                name: "High waterlogging risk".to_string(),
                event_type: Some(EventType::Water),
                min_probability: Score::new(0.75),
                severity: Severity::High,
                channels: channels(&[Channel::Dashboard, Channel::Sms]),
                message_template: "Waterlogging risk in {area_name} ({probability})".to_string(),
                enabled: true,
            },
            AlertRule {
                id: RuleId::new(4),
                name: "Garbage accumulation".to_string(),
                event_type: Some(EventType::Garbage),
                min_probability: Score::new(0.6),
                severity: Severity::Medium,
                channels: channels(&[Channel::Dashboard, Channel::Email]),
                message_template: "Garbage accumulation reported in {area_name}".to_string(),
                enabled: true,
            },
            AlertRule {
                id: RuleId::new(5),
                name: "Streetlight outage".to_string(),
                event_type: Some(EventType::Light),
                min_probability: Score::new(0.6),
                severity: Severity::Medium,
                channels: channels(&[Channel::Dashboard]),
                message_template: "Streetlight issues reported in {area_name}".to_string(),
                enabled: true,
            },
        ])
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    /// Pick the single best match for an event: highest severity wins, ties
    /// broken by authoring order. At most one alert per event, ever.
    pub fn best_match(&self, event: &ClaimEvent) -> Option<&AlertRule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(event))
            .max_by(|a, b| {
                a.severity
                    .cmp(&b.severity)
                    // max_by keeps the later of equal elements; invert the
                    // tie so the earlier rule wins.
                    .then(std::cmp::Ordering::Greater)
            })
    }
}
