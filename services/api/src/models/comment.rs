//! Comment model and related functionality

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::store::{Document, NoPatch};

/// Comment entity
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub id: ObjectId,
    pub owner: ObjectId,
    pub video: ObjectId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(owner: ObjectId, video: ObjectId, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::generate(),
            owner,
            video,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter over the comments collection
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub video: Option<ObjectId>,
}

/// Sortable comment fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommentSortKey {
    #[default]
    CreatedAt,
}

impl Document for Comment {
    const COLLECTION: &'static str = "comments";

    type Filter = CommentFilter;
    type SortKey = CommentSortKey;
    type Patch = NoPatch;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter.video {
            Some(video) => self.video == video,
            None => true,
        }
    }

    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            CommentSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn apply(&mut self, _patch: &Self::Patch) {}
}
