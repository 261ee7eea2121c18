//! The event broadcaster.
//!
//! One `tokio::sync::broadcast` channel carries the global feed; per-area
//! channels are created lazily on first use. Publishing is synchronous and
//! lossy — a send error just means nobody is listening on that topic.

use pulse_types::{Alert, AreaId, Claim, Timestamp, UserId};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::topics::{BroadcastEvent, CoreEvent, Topic};

/// Topic-based publish/subscribe surface for real-time events.
pub struct EventBroadcaster {
    capacity: usize,
    global_tx: broadcast::Sender<BroadcastEvent>,
    area_txs: RwLock<HashMap<AreaId, broadcast::Sender<BroadcastEvent>>>,
}

impl EventBroadcaster {
    /// Create a broadcaster with the given per-channel buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity);
        Self {
            capacity,
            global_tx,
            area_txs: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribe to a topic. Only events published after this call are
    /// delivered (no replay).
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BroadcastEvent> {
        match topic {
            Topic::Global => self.global_tx.subscribe(),
            Topic::Area(area) => self.area_sender(area).subscribe(),
        }
    }

    /// Publish an event to one topic. Never blocks, never fails the caller.
    pub fn publish(&self, topic: Topic, event: CoreEvent, payload: serde_json::Value) {
        let msg = BroadcastEvent {
            event,
            payload,
            timestamp: Timestamp::now(),
        };
        let delivered = match topic {
            Topic::Global => self.global_tx.send(msg).unwrap_or(0),
            Topic::Area(area) => self.area_sender(area).send(msg).unwrap_or(0),
        };
        trace!(%topic, %event, delivered, "published");
    }

    /// Publish to both the global feed and the event's area feed.
    pub fn publish_scoped(&self, area: AreaId, event: CoreEvent, payload: serde_json::Value) {
        self.publish(Topic::Global, event, payload.clone());
        self.publish(Topic::Area(area), event, payload);
    }

    /// Number of subscribers currently on a topic.
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        match topic {
            Topic::Global => self.global_tx.receiver_count(),
            Topic::Area(area) => self
                .area_txs
                .read()
                .expect("area channel map poisoned")
                .get(&area)
                .map(|tx| tx.receiver_count())
                .unwrap_or(0),
        }
    }

    fn area_sender(&self, area: AreaId) -> broadcast::Sender<BroadcastEvent> {
        if let Some(tx) = self
            .area_txs
            .read()
            .expect("area channel map poisoned")
            .get(&area)
        {
            return tx.clone();
        }
        let mut map = self.area_txs.write().expect("area channel map poisoned");
        map.entry(area)
            .or_insert_with(|| {
                debug!(%area, "creating area feed");
                broadcast::channel(self.capacity).0
            })
            .clone()
    }

    // -- typed payload helpers ------------------------------------------

    /// Publish `claim:new` for a freshly registered claim.
    pub fn publish_claim_new(&self, claim: &Claim) {
        let payload = serde_json::json!({
            "claim_id": claim.id,
            "kind": claim.kind,
            "event_type": claim.event_type,
            "area_id": claim.area_id,
            "area_name": claim.area_name,
            "probability": claim.probability,
        });
        self.publish_scoped(claim.area_id, CoreEvent::ClaimNew, payload);
    }

    /// Publish `claim:vote` after a vote is recorded.
    pub fn publish_claim_vote(&self, claim: &Claim, voter: &UserId) {
        let payload = serde_json::json!({
            "claim_id": claim.id,
            "voter": voter,
            "verification_score": claim.verification_score,
            "verification_count": claim.verification_count,
        });
        self.publish_scoped(claim.area_id, CoreEvent::ClaimVote, payload);
    }

    /// Publish `claim:status` after any transition (automatic or admin).
    pub fn publish_claim_status(&self, claim: &Claim) {
        let payload = serde_json::json!({
            "claim_id": claim.id,
            "status": claim.status,
            "verification_score": claim.verification_score,
            "changed_at": claim.status_changed_at,
        });
        self.publish_scoped(claim.area_id, CoreEvent::ClaimStatus, payload);
    }

    /// Publish `alert:new` for a generated alert.
    pub fn publish_alert_new(&self, alert: &Alert, area: AreaId) {
        let payload = serde_json::json!({
            "alert_id": alert.id,
            "source_claim_id": alert.source_claim_id,
            "severity": alert.severity,
            "title": alert.title,
            "message": alert.message,
        });
        self.publish_scoped(area, CoreEvent::AlertNew, payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> serde_json::Value {
        serde_json::json!({"k": "v"})
    }

    #[tokio::test]
    async fn global_subscribers_all_receive() {
        let b = EventBroadcaster::new(16);
        let mut rx1 = b.subscribe(Topic::Global);
        let mut rx2 = b.subscribe(Topic::Global);

        b.publish(Topic::Global, CoreEvent::ClaimNew, payload());

        assert_eq!(rx1.recv().await.unwrap().event, CoreEvent::ClaimNew);
        assert_eq!(rx2.recv().await.unwrap().event, CoreEvent::ClaimNew);
    }

    #[tokio::test]
    async fn area_feeds_are_isolated() {
        let b = EventBroadcaster::new(16);
        let mut rx_a = b.subscribe(Topic::Area(AreaId::new(1)));
        let mut rx_b = b.subscribe(Topic::Area(AreaId::new(2)));

        b.publish(Topic::Area(AreaId::new(1)), CoreEvent::AlertNew, payload());

        assert_eq!(rx_a.recv().await.unwrap().event, CoreEvent::AlertNew);
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let b = EventBroadcaster::new(16);
        // Must not panic or error out.
        b.publish(Topic::Global, CoreEvent::ClaimStatus, payload());
        b.publish(Topic::Area(AreaId::new(42)), CoreEvent::ClaimStatus, payload());
    }

    #[tokio::test]
    async fn scoped_publish_hits_global_and_area() {
        let b = EventBroadcaster::new(16);
        let mut global = b.subscribe(Topic::Global);
        let mut area = b.subscribe(Topic::Area(AreaId::new(5)));

        b.publish_scoped(AreaId::new(5), CoreEvent::ClaimVote, payload());

        assert_eq!(global.recv().await.unwrap().event, CoreEvent::ClaimVote);
        assert_eq!(area.recv().await.unwrap().event, CoreEvent::ClaimVote);
    }

    #[tokio::test]
    async fn late_subscribers_get_no_replay() {
        let b = EventBroadcaster::new(16);
        b.publish(Topic::Global, CoreEvent::ClaimNew, payload());
        let mut rx = b.subscribe(Topic::Global);
        assert!(rx.try_recv().is_err());
    }
}
