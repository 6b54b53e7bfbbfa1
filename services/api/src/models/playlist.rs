//! Playlist model and related functionality

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::store::Document;

/// Playlist entity
///
/// `videos` is an ordered set: insertion order is preserved and duplicates
/// are suppressed on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Playlist {
    pub id: ObjectId,
    pub owner: ObjectId,
    pub name: String,
    pub description: String,
    pub videos: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    pub fn new(owner: ObjectId, name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::generate(),
            owner,
            name: name.into(),
            description: description.into(),
            videos: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter over the playlists collection
#[derive(Debug, Clone, Default)]
pub struct PlaylistFilter {
    pub owner: Option<ObjectId>,
}

/// Sortable playlist fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaylistSortKey {
    #[default]
    CreatedAt,
}

/// Fields of a playlist this core is allowed to update
#[derive(Debug, Clone, Default)]
pub struct PlaylistPatch {
    pub videos: Option<Vec<ObjectId>>,
}

impl Document for Playlist {
    const COLLECTION: &'static str = "playlists";

    type Filter = PlaylistFilter;
    type SortKey = PlaylistSortKey;
    type Patch = PlaylistPatch;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        match filter.owner {
            Some(owner) => self.owner == owner,
            None => true,
        }
    }

    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            PlaylistSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(videos) = &patch.videos {
            self.videos = videos.clone();
        }
        self.updated_at = Utc::now();
    }
}
