//! Integration tests exercising the full core pipeline:
//! claim registration → votes → lifecycle transitions → broadcast, and
//! event ingestion → rule matching → alert → dispatch.
//!
//! These tests wire together components that are normally only connected
//! inside `core.rs`, verifying the system works end-to-end — not just
//! in isolation.

use pulse_alerts::{
    ClaimEvent, NotificationPayload, NotificationSender, RuleSet, SendError, SendFuture,
};
use pulse_broadcast::{CoreEvent, Topic};
use pulse_engine::{CivicEngine, EngineConfig};
use pulse_types::{
    AlertStatus, AreaId, Channel, Claim, ClaimId, ClaimKind, ClaimStatus, EventType, Location,
    Score, UserId,
};
use pulse_verification::{AdminAction, VoteResponse};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RecordingSender {
    sends: Mutex<Vec<(Channel, NotificationPayload)>>,
    fail_sms: bool,
}

impl RecordingSender {
    fn sends(&self) -> Vec<(Channel, NotificationPayload)> {
        self.sends.lock().unwrap().clone()
    }
}

impl NotificationSender for RecordingSender {
    fn send(&self, channel: Channel, payload: NotificationPayload) -> SendFuture {
        self.sends.lock().unwrap().push((channel, payload));
        let fail = self.fail_sms && channel == Channel::Sms;
        Box::pin(async move {
            if fail {
                Err(SendError::Gateway("provider unavailable".to_string()))
            } else {
                Ok(())
            }
        })
    }
}

fn engine_with(sender: Arc<RecordingSender>) -> Arc<CivicEngine> {
    CivicEngine::new(EngineConfig::default(), RuleSet::standard(), sender)
}

fn make_claim(id: u64, area: u64, event_type: EventType) -> Claim {
    Claim::new(
        ClaimId::new(id),
        ClaimKind::Incident,
        event_type,
        AreaId::new(area),
        format!("Area-{area}"),
        Location {
            latitude: 22.30,
            longitude: 73.18,
        },
        Score::new(0.8),
        pulse_types::Timestamp::now(),
    )
}

fn make_event(claim: &Claim, probability: f64) -> ClaimEvent {
    ClaimEvent {
        claim_id: claim.id,
        event_type: claim.event_type,
        probability: Score::new(probability),
        area_id: claim.area_id,
        area_name: claim.area_name.clone(),
    }
}

/// Poll until the alert reaches `status` or the deadline passes.
async fn wait_for_alert_status(
    engine: &CivicEngine,
    id: pulse_types::AlertId,
    status: AlertStatus,
) {
    for _ in 0..100 {
        if engine.alert(id).unwrap().status == status {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("alert {id} never reached {status:?}");
}

// ---------------------------------------------------------------------------
// 1. Vote → transition → broadcast pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn votes_verify_claim_and_broadcast_each_step() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let claim = make_claim(1, 7, EventType::Garbage);
    let mut global = engine.subscribe(Topic::Global);
    let mut area = engine.subscribe_area(AreaId::new(7));

    engine.register_claim(claim.clone()).unwrap();
    assert_eq!(global.recv().await.unwrap().event, CoreEvent::ClaimNew);
    assert_eq!(area.recv().await.unwrap().event, CoreEvent::ClaimNew);

    // From the 0.5 baseline: partial lifts to 0.65, still Pending.
    let first = engine
        .submit_vote(claim.id, UserId::from("citizen-a"), VoteResponse::Partial, false)
        .unwrap();
    assert!((first.new_score - 0.65).abs() < 1e-9);
    assert_eq!(first.status, ClaimStatus::Pending);
    assert_eq!(global.recv().await.unwrap().event, CoreEvent::ClaimVote);

    // A plain yes pushes to 0.90, over the verify threshold.
    let second = engine
        .submit_vote(claim.id, UserId::from("citizen-b"), VoteResponse::Yes, false)
        .unwrap();
    assert!((second.new_score - 0.90).abs() < 1e-9);
    assert_eq!(second.transitioned, Some(ClaimStatus::Verified));

    // claim:vote then claim:status for the transition.
    assert_eq!(global.recv().await.unwrap().event, CoreEvent::ClaimVote);
    let status_event = global.recv().await.unwrap();
    assert_eq!(status_event.event, CoreEvent::ClaimStatus);
    assert_eq!(status_event.payload["status"], "VERIFIED");

    // A later vote still lands in the ledger but the status is frozen.
    let third = engine
        .submit_vote(claim.id, UserId::from("citizen-c"), VoteResponse::No, false)
        .unwrap();
    assert_eq!(third.status, ClaimStatus::Verified);
    assert_eq!(third.transitioned, None);
    assert_eq!(engine.claim(claim.id).unwrap().verification_count, 3);
}

#[tokio::test]
async fn duplicate_vote_is_rejected_and_changes_nothing() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let claim = make_claim(2, 1, EventType::Traffic);
    engine.register_claim(claim.clone()).unwrap();

    engine
        .submit_vote(claim.id, UserId::from("citizen-a"), VoteResponse::Yes, false)
        .unwrap();
    let err = engine
        .submit_vote(claim.id, UserId::from("citizen-a"), VoteResponse::Yes, true)
        .unwrap_err();
    assert!(err.to_string().contains("already voted"));

    let snapshot = engine.claim(claim.id).unwrap();
    assert!((snapshot.verification_score.value() - 0.75).abs() < 1e-9);
    assert_eq!(snapshot.verification_count, 1);
}

#[tokio::test]
async fn vote_on_unknown_claim_is_not_found() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let err = engine
        .submit_vote(ClaimId::new(404), UserId::from("x"), VoteResponse::Yes, false)
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn concurrent_votes_on_one_claim_lose_no_updates() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let claim = make_claim(3, 1, EventType::Water);
    engine.register_claim(claim.clone()).unwrap();

    let mut handles = Vec::new();
    for i in 0..20 {
        let engine = Arc::clone(&engine);
        let id = claim.id;
        handles.push(tokio::spawn(async move {
            engine
                .submit_vote(id, UserId::new(format!("citizen-{i}")), VoteResponse::Yes, false)
                .unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let snapshot = engine.claim(claim.id).unwrap();
    assert_eq!(snapshot.verification_count, 20);
    // From the 0.5 baseline, 20 × +0.25 clamps at 1.0; the claim verified
    // on the way up.
    assert_eq!(snapshot.verification_score.value(), 1.0);
    assert_eq!(snapshot.status, ClaimStatus::Verified);
}

// ---------------------------------------------------------------------------
// 2. Admin actions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn admin_lifecycle_with_legality_checks() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let claim = make_claim(4, 2, EventType::Light);
    engine.register_claim(claim.clone()).unwrap();
    let mut global = engine.subscribe(Topic::Global);

    // Resolve straight from Pending is illegal.
    let err = engine
        .admin_action(claim.id, AdminAction::Resolve, UserId::from("admin"), None)
        .unwrap_err();
    assert!(err.to_string().contains("cannot resolve"));
    assert_eq!(engine.claim(claim.id).unwrap().status, ClaimStatus::Pending);

    let status = engine
        .admin_action(
            claim.id,
            AdminAction::Approve,
            UserId::from("admin"),
            Some("crew assigned".to_string()),
        )
        .unwrap();
    assert_eq!(status, ClaimStatus::Approved);
    assert_eq!(global.recv().await.unwrap().event, CoreEvent::ClaimStatus);

    let status = engine
        .admin_action(claim.id, AdminAction::Resolve, UserId::from("admin"), None)
        .unwrap();
    assert_eq!(status, ClaimStatus::Resolved);
}

// ---------------------------------------------------------------------------
// 3. Event ingestion → alert → dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ingest_fires_alert_broadcasts_and_dispatches() {
    let sender = Arc::new(RecordingSender::default());
    let engine = engine_with(Arc::clone(&sender));
    let claim = make_claim(5, 9, EventType::Traffic);
    engine.register_claim(claim.clone()).unwrap();
    let mut area = engine.subscribe_area(AreaId::new(9));

    let outcome = engine.ingest_event(make_event(&claim, 0.92));
    assert!(outcome.alert_created);
    let alert_id = outcome.alert_id.unwrap();

    let event = area.recv().await.unwrap();
    assert_eq!(event.event, CoreEvent::AlertNew);
    assert_eq!(event.payload["severity"], "critical");

    // Dispatch runs in the background and flips Pending → Sent.
    wait_for_alert_status(&engine, alert_id, AlertStatus::Sent).await;
    let alert = engine.alert(alert_id).unwrap();
    assert!(alert.sent_at.is_some());

    // The critical rule carries email + sms; both were attempted.
    let mut channels: Vec<Channel> = sender.sends().into_iter().map(|(c, _)| c).collect();
    channels.sort();
    assert_eq!(channels, vec![Channel::Email, Channel::Sms]);
}

#[tokio::test]
async fn second_event_within_cooldown_is_suppressed() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let claim = make_claim(6, 3, EventType::Water);
    engine.register_claim(claim.clone()).unwrap();

    let first = engine.ingest_event(make_event(&claim, 0.85));
    assert!(first.alert_created);

    let second = engine.ingest_event(make_event(&claim, 0.95));
    assert!(!second.alert_created);
    assert_eq!(second.alert_id, None);

    // A different area is untouched by that cooldown.
    let other = make_claim(7, 4, EventType::Water);
    engine.register_claim(other.clone()).unwrap();
    assert!(engine.ingest_event(make_event(&other, 0.85)).alert_created);
}

#[tokio::test]
async fn failed_channel_still_marks_alert_sent() {
    let sender = Arc::new(RecordingSender {
        sends: Mutex::new(Vec::new()),
        fail_sms: true,
    });
    let engine = engine_with(Arc::clone(&sender));
    let claim = make_claim(8, 5, EventType::Traffic);
    engine.register_claim(claim.clone()).unwrap();

    let outcome = engine.ingest_event(make_event(&claim, 0.95));
    let alert_id = outcome.alert_id.unwrap();

    // SMS fails, email succeeds, the alert still transitions to Sent.
    wait_for_alert_status(&engine, alert_id, AlertStatus::Sent).await;
    assert_eq!(sender.sends().len(), 2);
}

#[tokio::test]
async fn alert_acknowledge_and_resolve_lifecycle() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let claim = make_claim(9, 6, EventType::Garbage);
    engine.register_claim(claim.clone()).unwrap();

    let alert_id = engine
        .ingest_event(make_event(&claim, 0.95))
        .alert_id
        .unwrap();

    // Operators only see alerts after dispatch marks them Sent.
    wait_for_alert_status(&engine, alert_id, AlertStatus::Sent).await;
    let status = engine.acknowledge_alert(alert_id).unwrap();
    assert_eq!(status, AlertStatus::Acknowledged);
    assert!(engine.alert(alert_id).unwrap().acknowledged_at.is_some());

    // Acknowledging twice is illegal.
    assert!(engine.acknowledge_alert(alert_id).is_err());

    let status = engine.resolve_alert(alert_id).unwrap();
    assert_eq!(status, AlertStatus::Resolved);
    assert!(engine.resolve_alert(alert_id).is_err());
}

#[tokio::test]
async fn pending_alert_refuses_acknowledge_and_resolve() {
    // A sender that never completes keeps the alert Pending while we
    // exercise the legality checks.
    struct StallingSender;
    impl NotificationSender for StallingSender {
        fn send(&self, _channel: Channel, _payload: NotificationPayload) -> SendFuture {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            })
        }
    }

    let config = EngineConfig {
        notify_timeout_secs: 600,
        ..EngineConfig::default()
    };
    let engine = CivicEngine::new(config, RuleSet::standard(), Arc::new(StallingSender));
    let claim = make_claim(10, 8, EventType::Traffic);
    engine.register_claim(claim.clone()).unwrap();

    let alert_id = engine
        .ingest_event(make_event(&claim, 0.95))
        .alert_id
        .unwrap();
    assert_eq!(engine.alert(alert_id).unwrap().status, AlertStatus::Pending);

    assert!(engine.acknowledge_alert(alert_id).is_err());
    assert!(engine.resolve_alert(alert_id).is_err());
    assert_eq!(engine.alert(alert_id).unwrap().status, AlertStatus::Pending);
}

// ---------------------------------------------------------------------------
// 4. Background sweep and teardown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sweep_task_stops_on_shutdown() {
    let engine = engine_with(Arc::new(RecordingSender::default()));
    let handle = engine.start_sweep();

    engine.shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("sweep task did not stop")
        .unwrap();
}
