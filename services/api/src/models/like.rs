//! Like model and related functionality
//!
//! A like targets exactly one video or one comment; the target is encoded
//! as an enum so the exactly-one invariant holds by construction. The store
//! enforces at most one like per (target, liked_by) pair, which is what
//! makes concurrent toggles safe.

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::store::{Document, NoPatch};

/// What a like points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Video(ObjectId),
    Comment(ObjectId),
}

/// Like entity
#[derive(Debug, Clone, PartialEq)]
pub struct Like {
    pub id: ObjectId,
    pub target: LikeTarget,
    pub liked_by: ObjectId,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(target: LikeTarget, liked_by: ObjectId) -> Self {
        Self {
            id: ObjectId::generate(),
            target,
            liked_by,
            created_at: Utc::now(),
        }
    }

    /// Video id when this like targets a video.
    pub fn video(&self) -> Option<ObjectId> {
        match self.target {
            LikeTarget::Video(id) => Some(id),
            LikeTarget::Comment(_) => None,
        }
    }

    /// Comment id when this like targets a comment.
    pub fn comment(&self) -> Option<ObjectId> {
        match self.target {
            LikeTarget::Comment(id) => Some(id),
            LikeTarget::Video(_) => None,
        }
    }
}

/// Filter over the likes collection
#[derive(Debug, Clone, Default)]
pub struct LikeFilter {
    pub liked_by: Option<ObjectId>,
    pub video: Option<ObjectId>,
    pub comment: Option<ObjectId>,
    pub video_in: Option<Vec<ObjectId>>,
    pub comment_in: Option<Vec<ObjectId>>,
}

/// Sortable like fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LikeSortKey {
    #[default]
    CreatedAt,
}

impl Document for Like {
    const COLLECTION: &'static str = "likes";

    type Filter = LikeFilter;
    type SortKey = LikeSortKey;
    type Patch = NoPatch;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        if let Some(liked_by) = filter.liked_by {
            if self.liked_by != liked_by {
                return false;
            }
        }
        if let Some(video) = filter.video {
            if self.video() != Some(video) {
                return false;
            }
        }
        if let Some(comment) = filter.comment {
            if self.comment() != Some(comment) {
                return false;
            }
        }
        if let Some(videos) = &filter.video_in {
            match self.video() {
                Some(id) if videos.contains(&id) => {}
                _ => return false,
            }
        }
        if let Some(comments) = &filter.comment_in {
            match self.comment() {
                Some(id) if comments.contains(&id) => {}
                _ => return false,
            }
        }
        true
    }

    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            LikeSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn apply(&mut self, _patch: &Self::Patch) {}

    fn conflict(&self, other: &Self) -> Option<String> {
        if self.liked_by == other.liked_by && self.target == other.target {
            return Some("already liked".to_string());
        }
        None
    }
}
