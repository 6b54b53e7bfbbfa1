//! Video feed and watch-page pipelines

use common::config::PaginationConfig;
use common::id::ObjectId;
use common::page::{Page, PageRequest};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{UserPatch, Video, VideoFilter, VideoPatch, VideoSortKey, Viewer};
use crate::pipeline::{paginate, stages};
use crate::store::{Direction, Order, Store};
use crate::views::{UserSummary, VideoDetail, VideoOwner, VideoSummary};

/// Query parameters of the video feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Case-insensitive substring match on the title
    pub query: Option<String>,
    pub sort_by: Option<VideoSortKey>,
    pub sort_type: Option<Direction>,
    /// Restrict the feed to one owner's uploads
    pub user_id: Option<String>,
}

/// Composes the video feed and video detail pipelines.
#[derive(Clone)]
pub struct VideoService {
    store: Store,
    pagination: PaginationConfig,
}

impl VideoService {
    pub fn new(store: Store, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Paginated feed of published videos with owner summaries attached.
    ///
    /// Sort defaults to newest first; ties keep insertion order. The feed
    /// carries no personalized fields, so the viewer identity is unused
    /// here but kept in the signature like every other entry point.
    pub async fn list_videos(
        &self,
        query: ListVideosQuery,
        _viewer: Option<Viewer>,
    ) -> ApiResult<Page<VideoSummary>> {
        let request = PageRequest::new(query.page, query.limit, &self.pagination)?;
        let owner = match query.user_id.as_deref() {
            Some(raw) => Some(ObjectId::parse(raw)?),
            None => None,
        };

        let filter = VideoFilter {
            owner,
            published: Some(true),
            title_search: query.query,
            ..Default::default()
        };
        let order = Order {
            key: query.sort_by.unwrap_or_default(),
            direction: query.sort_type.unwrap_or_default(),
        };

        let page = paginate(self.store.videos.as_ref(), &filter, order, &request).await?;
        tracing::debug!(
            total = page.total_items,
            page = page.current_page,
            "video feed assembled"
        );

        let owners = stages::owner_summaries(&self.store, page.items.iter().map(|v| v.owner))
            .await?;
        let items = page
            .items
            .iter()
            .map(|video| VideoSummary::new(video, owners.get(&video.owner).cloned()))
            .collect();

        Ok(page.with_items(items))
    }

    /// Watch-page view of one video.
    ///
    /// Side effects: the stored view counter goes up by exactly one per
    /// successful call, and for a signed-in viewer the video id is added to
    /// the front of the watch history unless it is already present (an
    /// existing entry is not moved).
    pub async fn get_video(&self, video_id: &str, viewer: Option<Viewer>) -> ApiResult<VideoDetail> {
        let id = ObjectId::parse(video_id)?;

        let video = self
            .store
            .videos
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotFound("video"))?;

        // Read-then-write: uniqueness of the counter is not guaranteed
        // across concurrent calls, monotonicity is.
        let video = self
            .store
            .videos
            .update_by_id(
                id,
                &VideoPatch {
                    views: Some(video.views + 1),
                },
            )
            .await?
            .ok_or(ApiError::NotFound("video"))?;

        if let Some(viewer) = viewer {
            self.record_watch(viewer, id).await?;
        }

        self.compose_detail(video, viewer).await
    }

    /// The viewer's watch history, most recent first, with owner summaries.
    /// History entries whose video has since been deleted are skipped.
    pub async fn watch_history(&self, viewer: Viewer) -> ApiResult<Vec<VideoSummary>> {
        let user = self
            .store
            .users
            .find_by_id(viewer.id)
            .await?
            .ok_or(ApiError::NotFound("user"))?;

        if user.watch_history.is_empty() {
            return Ok(Vec::new());
        }

        let videos = self
            .store
            .videos
            .find(
                &VideoFilter {
                    ids: Some(user.watch_history.clone()),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;
        let owners =
            stages::owner_summaries(&self.store, videos.iter().map(|v| v.owner)).await?;

        // Project in stored history order, not store order.
        let mut items = Vec::with_capacity(videos.len());
        for id in &user.watch_history {
            if let Some(video) = videos.iter().find(|v| v.id == *id) {
                items.push(VideoSummary::new(video, owners.get(&video.owner).cloned()));
            }
        }
        Ok(items)
    }

    async fn record_watch(&self, viewer: Viewer, video_id: ObjectId) -> ApiResult<()> {
        let Some(user) = self.store.users.find_by_id(viewer.id).await? else {
            // A verified viewer without a user row is a stale token, not a
            // reason to fail the read.
            tracing::warn!(viewer = %viewer.id, "viewer has no user row, skipping history");
            return Ok(());
        };

        if user.watch_history.contains(&video_id) {
            return Ok(());
        }

        let mut history = user.watch_history;
        history.insert(0, video_id);
        self.store
            .users
            .update_by_id(
                viewer.id,
                &UserPatch {
                    watch_history: Some(history),
                },
            )
            .await?;
        Ok(())
    }

    async fn compose_detail(&self, video: Video, viewer: Option<Viewer>) -> ApiResult<VideoDetail> {
        let likes_count = stages::video_like_counts(&self.store, &[video.id])
            .await?
            .get(&video.id)
            .copied()
            .unwrap_or(0);
        let is_liked = stages::viewer_video_likes(&self.store, viewer, &[video.id])
            .await?
            .contains(&video.id);

        let owner = match self.store.users.find_by_id(video.owner).await? {
            Some(user) => {
                let subscribers_count = stages::subscriber_counts(&self.store, &[user.id])
                    .await?
                    .get(&user.id)
                    .copied()
                    .unwrap_or(0);
                let is_subscribed = stages::viewer_subscriptions(&self.store, viewer, &[user.id])
                    .await?
                    .contains(&user.id);
                let summary = UserSummary::from(&user);
                Some(VideoOwner {
                    id: summary.id,
                    username: summary.username,
                    full_name: summary.full_name,
                    avatar: summary.avatar,
                    subscribers_count,
                    is_subscribed,
                })
            }
            None => None,
        };

        Ok(VideoDetail {
            id: video.id,
            title: video.title,
            description: video.description,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            duration: video.duration,
            views: video.views,
            published: video.published,
            created_at: video.created_at,
            likes_count,
            is_liked,
            owner,
        })
    }
}
