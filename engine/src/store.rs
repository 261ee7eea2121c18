//! In-memory claim store with per-claim locking.
//!
//! Each claim lives behind its own mutex, so the read-modify-write of a
//! vote or admin action is atomic per claim while votes on different
//! claims proceed fully in parallel. The outer map lock is only held long
//! enough to fetch or insert an entry handle, never across claim work.

use pulse_types::{Claim, ClaimId};
use pulse_verification::{AdminRecord, ClaimVotes};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::EngineError;

/// A claim plus its verification bookkeeping, guarded as one unit.
#[derive(Debug)]
pub struct ClaimEntry {
    pub claim: Claim,
    pub votes: ClaimVotes,
    pub admin_log: Vec<AdminRecord>,
}

/// Map of claim id → independently locked entry.
pub struct ClaimStore {
    claims: RwLock<HashMap<ClaimId, Arc<Mutex<ClaimEntry>>>>,
}

impl ClaimStore {
    pub fn new() -> Self {
        Self {
            claims: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new claim. Ids are assigned by the persistence layer and
    /// must be unique. Returns the new entry's lock handle.
    pub fn insert(&self, claim: Claim) -> Result<Arc<Mutex<ClaimEntry>>, EngineError> {
        let mut map = self.claims.write().expect("claim map poisoned");
        if map.contains_key(&claim.id) {
            return Err(EngineError::DuplicateClaim(claim.id));
        }
        let id = claim.id;
        let entry = Arc::new(Mutex::new(ClaimEntry {
            claim,
            votes: ClaimVotes::new(),
            admin_log: Vec::new(),
        }));
        map.insert(id, Arc::clone(&entry));
        Ok(entry)
    }

    /// Fetch the lock handle for one claim.
    pub fn entry(&self, id: ClaimId) -> Result<Arc<Mutex<ClaimEntry>>, EngineError> {
        self.claims
            .read()
            .expect("claim map poisoned")
            .get(&id)
            .cloned()
            .ok_or(EngineError::ClaimNotFound(id))
    }

    /// Run `f` under the claim's lock.
    pub fn with_entry<T>(
        &self,
        id: ClaimId,
        f: impl FnOnce(&mut ClaimEntry) -> Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        let entry = self.entry(id)?;
        let mut guard = entry.lock().expect("claim entry poisoned");
        f(&mut guard)
    }

    /// Snapshot a claim by value.
    pub fn snapshot(&self, id: ClaimId) -> Result<Claim, EngineError> {
        let entry = self.entry(id)?;
        let guard = entry.lock().expect("claim entry poisoned");
        Ok(guard.claim.clone())
    }

    pub fn len(&self) -> usize {
        self.claims.read().expect("claim map poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClaimStore {
    fn default() -> Self {
        Self::new()
    }
}
