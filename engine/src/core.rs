//! The engine itself — operation surface and background tasks.

use pulse_alerts::{
    AlertEngine, ClaimEvent, Evaluation, NotificationDispatcher, NotificationSender, RuleSet,
};
use pulse_broadcast::{BroadcastEvent, EventBroadcaster, Topic};
use pulse_types::{
    Alert, AlertId, AlertStatus, AreaId, Claim, ClaimId, ClaimStatus, Timestamp, UserId,
};
use pulse_verification::{
    apply_admin_action, cast_vote, AdminAction, VoteOutcome, VoteResponse,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::store::ClaimStore;

/// Result of ingesting one event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestOutcome {
    pub alert_created: bool,
    pub alert_id: Option<AlertId>,
}

impl IngestOutcome {
    fn none() -> Self {
        Self {
            alert_created: false,
            alert_id: None,
        }
    }
}

/// The CivicPulse core service instance.
///
/// Construct one per process with [`CivicEngine::new`], inject it wherever
/// claims, votes, or events enter the system, and tear it down with
/// [`shutdown`](Self::shutdown).
pub struct CivicEngine {
    config: EngineConfig,
    store: ClaimStore,
    alerts: AlertEngine,
    alert_log: RwLock<HashMap<AlertId, Alert>>,
    broadcaster: EventBroadcaster,
    dispatcher: Arc<NotificationDispatcher>,
    /// Stop flag for background tasks; flipped once by [`shutdown`](Self::shutdown).
    stop: watch::Sender<bool>,
}

impl CivicEngine {
    pub fn new(
        config: EngineConfig,
        rules: RuleSet,
        sender: Arc<dyn NotificationSender>,
    ) -> Arc<Self> {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            sender,
            Duration::from_secs(config.notify_timeout_secs),
        ));
        let (stop, _) = watch::channel(false);
        let engine = Self {
            alerts: AlertEngine::new(rules, config.cooldown_window_secs),
            broadcaster: EventBroadcaster::new(config.broadcast_capacity),
            alert_log: RwLock::new(HashMap::new()),
            store: ClaimStore::new(),
            dispatcher,
            stop,
            config,
        };
        info!(
            cooldown_window_secs = engine.config.cooldown_window_secs,
            sweep_interval_secs = engine.config.sweep_interval_secs,
            "engine initialized"
        );
        Arc::new(engine)
    }

    // -- claims ----------------------------------------------------------

    /// Register a newly persisted claim and announce it.
    pub fn register_claim(&self, claim: Claim) -> Result<(), EngineError> {
        let entry = self.store.insert(claim)?;
        let guard = entry.lock().expect("claim entry poisoned");
        self.broadcaster.publish_claim_new(&guard.claim);
        Ok(())
    }

    /// Submit one citizen vote on a claim.
    ///
    /// The read-modify-write of the claim's score and status happens under
    /// that claim's lock; votes on other claims are unaffected. Publishes
    /// `claim:vote` always and `claim:status` when the vote triggered an
    /// automatic transition.
    pub fn submit_vote(
        &self,
        claim_id: ClaimId,
        user_id: UserId,
        response: VoteResponse,
        has_photo: bool,
    ) -> Result<VoteOutcome, EngineError> {
        if user_id.is_empty() {
            return Err(EngineError::Validation("user id must not be empty"));
        }

        let voter = user_id.clone();
        let (outcome, snapshot) = self.store.with_entry(claim_id, |entry| {
            let outcome = cast_vote(
                &mut entry.claim,
                &mut entry.votes,
                user_id,
                response,
                has_photo,
                Timestamp::now(),
            )?;
            Ok((outcome, entry.claim.clone()))
        })?;

        self.broadcaster.publish_claim_vote(&snapshot, &voter);
        if outcome.transitioned.is_some() {
            self.broadcaster.publish_claim_status(&snapshot);
        }
        Ok(outcome)
    }

    /// Apply an operator decision to a claim.
    pub fn admin_action(
        &self,
        claim_id: ClaimId,
        action: AdminAction,
        admin_id: UserId,
        notes: Option<String>,
    ) -> Result<ClaimStatus, EngineError> {
        if admin_id.is_empty() {
            return Err(EngineError::Validation("admin id must not be empty"));
        }

        let snapshot = self.store.with_entry(claim_id, |entry| {
            let record = apply_admin_action(
                &mut entry.claim,
                action,
                admin_id,
                notes,
                Timestamp::now(),
            )?;
            entry.admin_log.push(record);
            Ok(entry.claim.clone())
        })?;

        self.broadcaster.publish_claim_status(&snapshot);
        Ok(snapshot.status)
    }

    /// Snapshot a claim by value (for the read side of the API layer).
    pub fn claim(&self, id: ClaimId) -> Result<Claim, EngineError> {
        self.store.snapshot(id)
    }

    // -- alerts ----------------------------------------------------------

    /// Evaluate a newly recorded incident/prediction event.
    ///
    /// When an alert fires it is stored, `alert:new` is broadcast, and
    /// external dispatch is spawned fire-and-forget — this call never
    /// blocks on the notification gateway, and gateway failures never roll
    /// anything back. Must run inside a tokio runtime.
    pub fn ingest_event(self: &Arc<Self>, event: ClaimEvent) -> IngestOutcome {
        let evaluation = self.alerts.evaluate(&event, Timestamp::now());
        let alert = match evaluation {
            Evaluation::Fired(alert) => alert,
            Evaluation::NoMatch | Evaluation::Suppressed { .. } => {
                return IngestOutcome::none();
            }
        };

        let alert_id = alert.id;
        self.alert_log
            .write()
            .expect("alert log poisoned")
            .insert(alert_id, alert.clone());
        self.broadcaster.publish_alert_new(&alert, event.area_id);
        self.spawn_dispatch(alert, event.area_name);

        IngestOutcome {
            alert_created: true,
            alert_id: Some(alert_id),
        }
    }

    fn spawn_dispatch(self: &Arc<Self>, alert: Alert, area_name: String) {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            let report = engine.dispatcher.dispatch(&alert, &area_name).await;
            debug!(
                alert = %alert.id,
                attempted = report.attempted,
                failed = report.failed,
                "dispatch complete"
            );
            engine.mark_alert_sent(alert.id);
        });
    }

    /// Flip Pending→Sent once all sends have been attempted. Skipped when
    /// an operator already moved the alert on.
    fn mark_alert_sent(&self, id: AlertId) {
        let mut log = self.alert_log.write().expect("alert log poisoned");
        if let Some(alert) = log.get_mut(&id) {
            if alert.status == AlertStatus::Pending {
                alert.status = AlertStatus::Sent;
                alert.sent_at = Some(Timestamp::now());
            }
        }
    }

    /// Operator acknowledgement of an alert. Legal only once dispatch has
    /// marked it `Sent`.
    pub fn acknowledge_alert(&self, id: AlertId) -> Result<AlertStatus, EngineError> {
        self.transition_alert(id, AlertStatus::Acknowledged, |status| {
            matches!(status, AlertStatus::Sent)
        })
    }

    /// Close out an alert. Legal from `Sent` or `Acknowledged`.
    pub fn resolve_alert(&self, id: AlertId) -> Result<AlertStatus, EngineError> {
        self.transition_alert(id, AlertStatus::Resolved, |status| {
            matches!(status, AlertStatus::Sent | AlertStatus::Acknowledged)
        })
    }

    fn transition_alert(
        &self,
        id: AlertId,
        to: AlertStatus,
        legal: impl Fn(AlertStatus) -> bool,
    ) -> Result<AlertStatus, EngineError> {
        let mut log = self.alert_log.write().expect("alert log poisoned");
        let alert = log.get_mut(&id).ok_or(EngineError::AlertNotFound(id))?;
        if !legal(alert.status) {
            return Err(EngineError::InvalidAlertTransition {
                from: alert.status,
                to,
            });
        }
        alert.status = to;
        let now = Timestamp::now();
        match to {
            AlertStatus::Acknowledged => alert.acknowledged_at = Some(now),
            AlertStatus::Resolved => alert.resolved_at = Some(now),
            AlertStatus::Sent => alert.sent_at = Some(now),
            AlertStatus::Pending => {}
        }
        Ok(to)
    }

    /// Snapshot an alert by value.
    pub fn alert(&self, id: AlertId) -> Result<Alert, EngineError> {
        self.alert_log
            .read()
            .expect("alert log poisoned")
            .get(&id)
            .cloned()
            .ok_or(EngineError::AlertNotFound(id))
    }

    // -- broadcast -------------------------------------------------------

    /// Subscribe to the global feed or one area's feed.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BroadcastEvent> {
        self.broadcaster.subscribe(topic)
    }

    /// Subscribe to one area's feed.
    pub fn subscribe_area(&self, area: AreaId) -> broadcast::Receiver<BroadcastEvent> {
        self.subscribe(Topic::Area(area))
    }

    // -- background ------------------------------------------------------

    /// Start the periodic cooldown sweep. Stops when [`shutdown`](Self::shutdown)
    /// is called.
    pub fn start_sweep(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        let mut stop_rx = self.stop.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(
                engine.config.sweep_interval_secs,
            ));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = engine.alerts.sweep_cooldowns(Timestamp::now());
                        if removed > 0 {
                            debug!(removed, "cooldown sweep removed stale entries");
                        }
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            info!("cooldown sweep stopped");
                            break;
                        }
                    }
                }
            }
        })
    }

    /// Stop background tasks. Idempotent.
    pub fn shutdown(&self) {
        let _ = self.stop.send(true);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
