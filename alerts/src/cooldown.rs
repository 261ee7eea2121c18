//! Cooldown cache — suppresses duplicate alerts for the same area and
//! event type within a time window.
//!
//! The check and the stamp are a single operation under one lock, so two
//! concurrent evaluations of the same key cannot both pass the check and
//! double-fire. A periodic sweep discards entries older than the window to
//! bound memory; a swept entry merely risks one redundant alert, never a
//! correctness problem.

use pulse_types::{AreaId, EventType, Timestamp};
use std::collections::HashMap;
use std::sync::Mutex;

/// Default cooldown window: 30 minutes.
pub const COOLDOWN_WINDOW_SECS: u64 = 30 * 60;

/// The deduplication key: one cooldown per area per event type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CooldownKey {
    pub area: AreaId,
    pub event_type: EventType,
}

/// Outcome of a cooldown check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CooldownDecision {
    /// No recent fire for this key; the entry has been stamped to `now`.
    Fire,
    /// A fire within the window exists; `remaining_secs` until it expires.
    Suppress { remaining_secs: u64 },
}

/// Key → last-fired-at map guarding alert deduplication.
pub struct CooldownCache {
    entries: Mutex<HashMap<CooldownKey, Timestamp>>,
}

impl CooldownCache {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Atomically check the key and, if clear, stamp it to `now`.
    pub fn check_and_record(
        &self,
        key: CooldownKey,
        now: Timestamp,
        window_secs: u64,
    ) -> CooldownDecision {
        let mut entries = self.entries.lock().expect("cooldown map poisoned");
        if let Some(last) = entries.get(&key) {
            if !last.has_expired(window_secs, now) {
                let remaining = window_secs - last.elapsed_since(now);
                return CooldownDecision::Suppress {
                    remaining_secs: remaining,
                };
            }
        }
        entries.insert(key, now);
        CooldownDecision::Fire
    }

    /// Drop entries older than the window. Returns how many were removed.
    pub fn sweep(&self, now: Timestamp, window_secs: u64) -> usize {
        let mut entries = self.entries.lock().expect("cooldown map poisoned");
        let before = entries.len();
        entries.retain(|_, last| !last.has_expired(window_secs, now));
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("cooldown map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CooldownCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(area: u64) -> CooldownKey {
        CooldownKey {
            area: AreaId::new(area),
            event_type: EventType::Traffic,
        }
    }

    #[test]
    fn first_fire_passes_and_stamps() {
        let cache = CooldownCache::new();
        assert_eq!(
            cache.check_and_record(key(1), Timestamp::new(100), 1800),
            CooldownDecision::Fire
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn second_fire_within_window_suppressed() {
        let cache = CooldownCache::new();
        cache.check_and_record(key(1), Timestamp::new(100), 1800);
        assert_eq!(
            cache.check_and_record(key(1), Timestamp::new(700), 1800),
            CooldownDecision::Suppress {
                remaining_secs: 1200
            }
        );
    }

    #[test]
    fn fire_after_window_passes_and_restamps() {
        let cache = CooldownCache::new();
        cache.check_and_record(key(1), Timestamp::new(100), 1800);
        assert_eq!(
            cache.check_and_record(key(1), Timestamp::new(1900), 1800),
            CooldownDecision::Fire
        );
        // The refreshed stamp now suppresses again.
        assert_eq!(
            cache.check_and_record(key(1), Timestamp::new(2000), 1800),
            CooldownDecision::Suppress {
                remaining_secs: 1700
            }
        );
    }

    #[test]
    fn distinct_keys_are_independent() {
        let cache = CooldownCache::new();
        cache.check_and_record(key(1), Timestamp::new(100), 1800);
        assert_eq!(
            cache.check_and_record(key(2), Timestamp::new(100), 1800),
            CooldownDecision::Fire
        );
        let other_type = CooldownKey {
            area: AreaId::new(1),
            event_type: EventType::Water,
        };
        assert_eq!(
            cache.check_and_record(other_type, Timestamp::new(100), 1800),
            CooldownDecision::Fire
        );
    }

    #[test]
    fn sweep_removes_only_expired_entries() {
        let cache = CooldownCache::new();
        cache.check_and_record(key(1), Timestamp::new(100), 1800);
        cache.check_and_record(key(2), Timestamp::new(1500), 1800);

        let removed = cache.sweep(Timestamp::new(2000), 1800);
        assert_eq!(removed, 1);
        assert_eq!(cache.len(), 1);

        // key(2) is still live and still suppresses.
        assert!(matches!(
            cache.check_and_record(key(2), Timestamp::new(2000), 1800),
            CooldownDecision::Suppress { .. }
        ));
    }
}
