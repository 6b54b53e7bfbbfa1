//! Video model and related functionality

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::store::Document;

/// Video entity
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: ObjectId,
    pub owner: ObjectId,
    pub title: String,
    pub description: String,
    /// Locator for the media asset, issued by the media storage collaborator
    pub video_file: String,
    pub thumbnail: String,
    /// Duration in seconds
    pub duration: f64,
    /// Monotonic view counter
    pub views: u64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Video {
    pub fn new(
        owner: ObjectId,
        title: impl Into<String>,
        description: impl Into<String>,
        video_file: impl Into<String>,
        thumbnail: impl Into<String>,
        duration: f64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::generate(),
            owner,
            title: title.into(),
            description: description.into(),
            video_file: video_file.into(),
            thumbnail: thumbnail.into(),
            duration,
            views: 0,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter over the videos collection
#[derive(Debug, Clone, Default)]
pub struct VideoFilter {
    pub ids: Option<Vec<ObjectId>>,
    pub owner: Option<ObjectId>,
    pub published: Option<bool>,
    /// Case-insensitive substring match on the title
    pub title_search: Option<String>,
}

/// Sortable video fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoSortKey {
    #[default]
    CreatedAt,
    Views,
    Duration,
    Title,
}

/// Fields of a video this core is allowed to update
#[derive(Debug, Clone, Default)]
pub struct VideoPatch {
    pub views: Option<u64>,
}

impl Document for Video {
    const COLLECTION: &'static str = "videos";

    type Filter = VideoFilter;
    type SortKey = VideoSortKey;
    type Patch = VideoPatch;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        if let Some(ids) = &filter.ids {
            if !ids.contains(&self.id) {
                return false;
            }
        }
        if let Some(owner) = filter.owner {
            if self.owner != owner {
                return false;
            }
        }
        if let Some(published) = filter.published {
            if self.published != published {
                return false;
            }
        }
        if let Some(needle) = &filter.title_search {
            if !self
                .title
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            VideoSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
            VideoSortKey::Views => self.views.cmp(&other.views),
            VideoSortKey::Duration => self.duration.total_cmp(&other.duration),
            VideoSortKey::Title => self.title.cmp(&other.title),
        }
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(views) = patch.views {
            self.views = views;
        }
        self.updated_at = Utc::now();
    }
}
