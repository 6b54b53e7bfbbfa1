//! Store interface consumed by the pipeline layer
//!
//! The composition core never talks to a database driver directly; it goes
//! through one [`Collection`] handle per entity, bundled in a [`Store`].
//! Each entity binds its own filter, sort-key, and patch types via
//! [`Document`], so a pipeline stage can only be composed with shapes the
//! entity actually produces.
//!
//! Backends must provide stable ordering for ties within a sort key (at
//! minimum insertion order) and must enforce the per-entity uniqueness
//! invariants on insert; that constraint is the race-safety mechanism the
//! toggle operations rely on.

pub mod memory;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use common::error::StoreResult;
use common::id::ObjectId;
use serde::Deserialize;

use crate::models::{Comment, Like, Playlist, Subscription, User, Video};

/// A persisted row shape.
pub trait Document: Clone + Send + Sync + 'static {
    /// Collection name, used in error detail only.
    const COLLECTION: &'static str;

    /// Filter shape accepted by `find`/`count`/`delete_many`.
    type Filter: Send + Sync;
    /// Fields the collection can be sorted by.
    type SortKey: Copy + Send + Sync;
    /// Partial update shape accepted by `update_by_id`.
    type Patch: Send + Sync;

    fn id(&self) -> ObjectId;

    /// Does this row satisfy every condition the filter carries?
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Compare two rows on the given sort key, ascending.
    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering;

    /// Apply a partial update in place.
    fn apply(&mut self, patch: &Self::Patch);

    /// Uniqueness check on insert: the invariant `other` would violate
    /// against this existing row, if any.
    fn conflict(&self, _other: &Self) -> Option<String> {
        None
    }
}

/// Patch type for entities this core never updates in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPatch;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

/// A fully determined ordering: sort key plus direction.
#[derive(Debug, Clone, Copy)]
pub struct Order<K> {
    pub key: K,
    pub direction: Direction,
}

impl<K> Order<K> {
    pub fn asc(key: K) -> Self {
        Self {
            key,
            direction: Direction::Asc,
        }
    }

    pub fn desc(key: K) -> Self {
        Self {
            key,
            direction: Direction::Desc,
        }
    }
}

impl<K: Default> Default for Order<K> {
    /// Default feed ordering: newest first.
    fn default() -> Self {
        Self::desc(K::default())
    }
}

/// Skip/limit window applied after ordering.
#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// One entity collection exposed by the persistence collaborator.
#[async_trait]
pub trait Collection<T: Document>: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>>;

    /// First row matching the filter, in insertion order.
    async fn find_one(&self, filter: &T::Filter) -> StoreResult<Option<T>>;

    /// All rows matching the filter, ordered, optionally windowed. The sort
    /// is applied before the window; ties keep insertion order.
    async fn find(
        &self,
        filter: &T::Filter,
        order: Order<T::SortKey>,
        window: Option<Window>,
    ) -> StoreResult<Vec<T>>;

    async fn count(&self, filter: &T::Filter) -> StoreResult<u64>;

    /// Insert a document, enforcing the entity's uniqueness invariants.
    /// Fails with [`common::error::StoreError::Duplicate`] on violation.
    async fn insert(&self, doc: T) -> StoreResult<ObjectId>;

    /// Apply a patch and return the updated document, or `None` when the
    /// id does not exist.
    async fn update_by_id(&self, id: ObjectId, patch: &T::Patch) -> StoreResult<Option<T>>;

    /// Returns whether a document was deleted.
    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<bool>;

    /// Delete all matching rows, returning how many were removed.
    async fn delete_many(&self, filter: &T::Filter) -> StoreResult<u64>;
}

/// One collection handle per entity.
///
/// Constructed once at process start and passed by reference through every
/// call; the core keeps no other state.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn Collection<User>>,
    pub videos: Arc<dyn Collection<Video>>,
    pub comments: Arc<dyn Collection<Comment>>,
    pub likes: Arc<dyn Collection<Like>>,
    pub subscriptions: Arc<dyn Collection<Subscription>>,
    pub playlists: Arc<dyn Collection<Playlist>>,
}

impl Store {
    /// In-memory store used by tests and embedded hosts.
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryCollection::new()),
            videos: Arc::new(memory::MemoryCollection::new()),
            comments: Arc::new(memory::MemoryCollection::new()),
            likes: Arc::new(memory::MemoryCollection::new()),
            subscriptions: Arc::new(memory::MemoryCollection::new()),
            playlists: Arc::new(memory::MemoryCollection::new()),
        }
    }
}
