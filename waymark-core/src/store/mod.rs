//! Persistence boundary for trails.
//!
//! [`TrailStore`] is the only interface the ingestion pipeline uses to read
//! and write trails. Upserts are caller-driven: look a trail up by its
//! external id, merge, then [`TrailStore::save`]. Implementations own id
//! assignment and timestamps.

mod memory;

use thiserror::Error;

use crate::{Difficulty, Trail, TrailId};

pub use memory::MemoryTrailStore;

/// Errors raised by [`TrailStore`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// Another trail already claims the external id.
    #[error("external id {external_id} already belongs to trail {existing}")]
    DuplicateExternalId {
        /// Conflicting upstream identifier.
        external_id: u64,
        /// Trail that owns the identifier.
        existing: TrailId,
    },
    /// An update referenced a trail the store does not hold.
    #[error("trail {id} does not exist")]
    UnknownTrail {
        /// Identifier that was not found.
        id: TrailId,
    },
    /// The storage backend failed.
    #[error("trail store backend failed: {message}")]
    Backend {
        /// Backend-specific description.
        message: String,
    },
}

/// Read and write access to persisted trails.
///
/// Methods take `&self`; implementations synchronise internally so a store
/// can be shared between concurrent ingestion runs.
///
/// # Examples
///
/// ```rust
/// use waymark_core::{MemoryTrailStore, Trail, TrailStore};
///
/// let store = MemoryTrailStore::default();
/// let trail = Trail { name: "Ridge".into(), external_id: Some(7), ..Trail::default() };
/// let saved = store.save(trail)?;
///
/// assert!(saved.id.is_some());
/// assert_eq!(store.find_by_external_id(7)?, Some(saved));
/// # Ok::<(), waymark_core::StoreError>(())
/// ```
pub trait TrailStore {
    /// Find the trail carrying the given upstream identifier.
    fn find_by_external_id(&self, external_id: u64) -> Result<Option<Trail>, StoreError>;

    /// Insert a trail without an id, or update the trail with the given id.
    ///
    /// Returns the stored record, with `id` and timestamps filled in.
    fn save(&self, trail: Trail) -> Result<Trail, StoreError>;

    /// Every stored trail, ordered by id.
    fn find_all(&self) -> Result<Vec<Trail>, StoreError>;

    /// Trails of the given difficulty, ordered by id.
    fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Trail>, StoreError>;

    /// Trails from the given source, ordered by id.
    fn find_by_source(&self, source: &str) -> Result<Vec<Trail>, StoreError>;
}

impl<T: TrailStore + ?Sized> TrailStore for std::sync::Arc<T> {
    fn find_by_external_id(&self, external_id: u64) -> Result<Option<Trail>, StoreError> {
        (**self).find_by_external_id(external_id)
    }

    fn save(&self, trail: Trail) -> Result<Trail, StoreError> {
        (**self).save(trail)
    }

    fn find_all(&self) -> Result<Vec<Trail>, StoreError> {
        (**self).find_all()
    }

    fn find_by_difficulty(&self, difficulty: Difficulty) -> Result<Vec<Trail>, StoreError> {
        (**self).find_by_difficulty(difficulty)
    }

    fn find_by_source(&self, source: &str) -> Result<Vec<Trail>, StoreError> {
        (**self).find_by_source(source)
    }
}
