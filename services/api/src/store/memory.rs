//! In-memory store backend
//!
//! Rows live in an insertion-ordered `Vec` behind an async `RwLock`; a
//! stable sort on top of that gives ties-break-by-insertion-order for free.
//! Uniqueness invariants are checked on insert under the write lock, which
//! makes the insert the linearization point concurrent toggles race on.

use async_trait::async_trait;
use common::error::{StoreError, StoreResult};
use common::id::ObjectId;
use tokio::sync::RwLock;

use super::{Collection, Direction, Document, Order, Window};

/// A single in-memory collection.
pub struct MemoryCollection<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Document> Collection<T> for MemoryCollection<T> {
    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn find_one(&self, filter: &T::Filter) -> StoreResult<Option<T>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.matches(filter)).cloned())
    }

    async fn find(
        &self,
        filter: &T::Filter,
        order: Order<T::SortKey>,
        window: Option<Window>,
    ) -> StoreResult<Vec<T>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<T> = rows
            .iter()
            .filter(|row| row.matches(filter))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let ordering = a.sort_cmp(b, order.key);
            match order.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });

        if let Some(window) = window {
            matched = matched
                .into_iter()
                .skip(window.skip as usize)
                .take(window.limit as usize)
                .collect();
        }

        Ok(matched)
    }

    async fn count(&self, filter: &T::Filter) -> StoreResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| row.matches(filter)).count() as u64)
    }

    async fn insert(&self, doc: T) -> StoreResult<ObjectId> {
        let mut rows = self.rows.write().await;
        for existing in rows.iter() {
            if let Some(detail) = existing.conflict(&doc) {
                return Err(StoreError::Duplicate {
                    collection: T::COLLECTION,
                    detail,
                });
            }
        }

        let id = doc.id();
        rows.push(doc);
        Ok(id)
    }

    async fn update_by_id(&self, id: ObjectId, patch: &T::Patch) -> StoreResult<Option<T>> {
        let mut rows = self.rows.write().await;
        match rows.iter_mut().find(|row| row.id() == id) {
            Some(row) => {
                row.apply(patch);
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        Ok(rows.len() < before)
    }

    async fn delete_many(&self, filter: &T::Filter) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| !row.matches(filter));
        Ok((before - rows.len()) as u64)
    }
}
