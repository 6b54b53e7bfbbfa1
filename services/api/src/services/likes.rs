//! Like toggles and the liked-videos feed

use common::error::StoreError;
use common::id::ObjectId;

use crate::error::{ApiError, ApiResult};
use crate::models::{Like, LikeFilter, LikeTarget, VideoFilter, Viewer};
use crate::pipeline::stages;
use crate::store::{Order, Store};
use crate::views::VideoSummary;

/// Composes like toggles and the viewer's liked-videos feed.
#[derive(Clone)]
pub struct LikeService {
    store: Store,
}

impl LikeService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Toggle the viewer's like on a video. Returns the resulting state:
    /// true when the video is now liked.
    pub async fn toggle_video_like(&self, video_id: &str, viewer: Viewer) -> ApiResult<bool> {
        let video_id = ObjectId::parse(video_id)?;
        self.store
            .videos
            .find_by_id(video_id)
            .await?
            .ok_or(ApiError::NotFound("video"))?;

        self.toggle(LikeTarget::Video(video_id), viewer).await
    }

    /// Toggle the viewer's like on a comment. Returns the resulting state.
    pub async fn toggle_comment_like(&self, comment_id: &str, viewer: Viewer) -> ApiResult<bool> {
        let comment_id = ObjectId::parse(comment_id)?;
        self.store
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or(ApiError::NotFound("comment"))?;

        self.toggle(LikeTarget::Comment(comment_id), viewer).await
    }

    /// Videos the viewer has liked, most recent like first, with owner
    /// summaries. An empty list is a valid result, not an error.
    pub async fn list_liked_videos(&self, viewer: Viewer) -> ApiResult<Vec<VideoSummary>> {
        let likes = self
            .store
            .likes
            .find(
                &LikeFilter {
                    liked_by: Some(viewer.id),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;

        let video_ids: Vec<ObjectId> = likes.iter().filter_map(|like| like.video()).collect();
        if video_ids.is_empty() {
            return Ok(Vec::new());
        }

        let videos = self
            .store
            .videos
            .find(
                &VideoFilter {
                    ids: Some(video_ids.clone()),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;
        let owners = stages::owner_summaries(&self.store, videos.iter().map(|v| v.owner)).await?;

        // Project in like-recency order; likes whose video has been
        // deleted are dropped.
        let mut items = Vec::with_capacity(video_ids.len());
        for id in &video_ids {
            if let Some(video) = videos.iter().find(|v| v.id == *id) {
                items.push(VideoSummary::new(video, owners.get(&video.owner).cloned()));
            }
        }
        Ok(items)
    }

    async fn toggle(&self, target: LikeTarget, viewer: Viewer) -> ApiResult<bool> {
        let filter = match target {
            LikeTarget::Video(id) => LikeFilter {
                video: Some(id),
                liked_by: Some(viewer.id),
                ..Default::default()
            },
            LikeTarget::Comment(id) => LikeFilter {
                comment: Some(id),
                liked_by: Some(viewer.id),
                ..Default::default()
            },
        };

        if let Some(existing) = self.store.likes.find_one(&filter).await? {
            self.store.likes.delete_by_id(existing.id).await?;
            tracing::info!(actor = %viewer.id, "like removed");
            return Ok(false);
        }

        match self.store.likes.insert(Like::new(target, viewer.id)).await {
            Ok(_) => {
                tracing::info!(actor = %viewer.id, "like created");
                Ok(true)
            }
            // A concurrent toggle won the insert; the target is liked,
            // which is the state this call wanted.
            Err(StoreError::Duplicate { .. }) => {
                tracing::warn!(actor = %viewer.id, "duplicate like insert tolerated");
                Ok(true)
            }
            Err(other) => Err(other.into()),
        }
    }
}
