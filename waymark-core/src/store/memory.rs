//! In-memory [`TrailStore`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use super::{StoreError, TrailStore};
use crate::{Difficulty, Trail, TrailId};

/// Thread-safe in-memory trail store.
///
/// Ids are assigned sequentially from 1. The store enforces external id
/// uniqueness and stamps `created_at` on insert and `updated_at` on every
/// save.
#[derive(Debug, Default)]
pub struct MemoryTrailStore {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    last_id: u64,
    trails: BTreeMap<TrailId, Trail>,
    by_external_id: HashMap<u64, TrailId>,
}

impl MemoryTrailStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored trails.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().trails.len()
    }

    /// Whether the store holds no trails.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().trails.is_empty()
    }

    // The state is only mutated after every check has passed, so a panic in
    // another thread cannot leave it half-written.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn filtered(&self, predicate: impl Fn(&Trail) -> bool) -> Vec<Trail> {
        self.lock()
            .trails
            .values()
            .filter(|trail| predicate(trail))
            .cloned()
            .collect()
    }
}

impl State {
    fn check_external_id(&self, trail: &Trail) -> Result<(), StoreError> {
        let Some(external_id) = trail.external_id else {
            return Ok(());
        };
        match self.by_external_id.get(&external_id) {
            Some(existing) if Some(*existing) != trail.id => Err(StoreError::DuplicateExternalId {
                external_id,
                existing: *existing,
            }),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, mut trail: Trail, now: SystemTime) -> Trail {
        self.last_id += 1;
        let id = TrailId(self.last_id);
        trail.id = Some(id);
        trail.created_at = Some(now);
        trail.updated_at = Some(now);
        if let Some(external_id) = trail.external_id {
            self.by_external_id.insert(external_id, id);
        }
        self.trails.insert(id, trail.clone());
        trail
    }

    fn update(
        &mut self,
        id: TrailId,
        mut trail: Trail,
        now: SystemTime,
    ) -> Result<Trail, StoreError> {
        let Some(previous) = self.trails.get(&id) else {
            return Err(StoreError::UnknownTrail { id });
        };
        let previous_external_id = previous.external_id;
        trail.created_at = previous.created_at.or(Some(now));
        trail.updated_at = Some(now);
        if previous_external_id != trail.external_id {
            if let Some(old) = previous_external_id {
                self.by_external_id.remove(&old);
            }
            if let Some(new) = trail.external_id {
                self.by_external_id.insert(new, id);
            }
        }
        self.trails.insert(id, trail.clone());
        Ok(trail)
    }
}

impl TrailStore for MemoryTrailStore {
    fn find_by_external_id(&self, external_id: u64) -> Result<Option<Trail>, StoreError> {
        let state = self.lock();
        Ok(state
            .by_external_id
            .get(&external_id)
            .and_then(|id| state.trails.get(id))
            .cloned())
    }

    fn save(&self, trail: Trail) -> Result<Trail, StoreError> {
        let mut state = self.lock();
        state.check_external_id(&trail)?;
        let now = SystemTime::now();
        match trail.id {
            Some(id) => state.update(id, trail, now),
            None => Ok(state.insert(trail, now)),
        }
    }

    fn find_all(&self) -> Result<Vec<Trail>, StoreError> {
        Ok(self.filtered(|_| true))
    }

    fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Trail>, StoreError> {
        Ok(self.filtered(|trail| trail.difficulty == difficulty))
    }

    fn find_by_source(&self, source: &str) -> Result<Vec<Trail>, StoreError> {
        Ok(self.filtered(|trail| trail.source == source))
    }
}
