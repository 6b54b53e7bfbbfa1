//! Owner dashboard pipelines
//!
//! These views are always scoped to the viewer's own channel, so
//! unpublished uploads are visible here and nowhere else.

use common::id::ObjectId;

use crate::error::ApiResult;
use crate::models::{SubscriptionFilter, VideoFilter, Viewer};
use crate::pipeline::stages;
use crate::store::{Order, Store};
use crate::views::{ChannelStats, ChannelVideo};

/// Composes the channel-owner dashboard views.
#[derive(Clone)]
pub struct DashboardService {
    store: Store,
}

impl DashboardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Aggregate totals for the viewer's channel: subscribers, likes,
    /// views, and uploads (unpublished included).
    pub async fn channel_stats(&self, viewer: Viewer) -> ApiResult<ChannelStats> {
        let total_subscribers = self
            .store
            .subscriptions
            .count(&SubscriptionFilter {
                channel: Some(viewer.id),
                ..Default::default()
            })
            .await?;

        let videos = self
            .store
            .videos
            .find(
                &VideoFilter {
                    owner: Some(viewer.id),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;
        let video_ids: Vec<ObjectId> = videos.iter().map(|v| v.id).collect();
        let like_counts = stages::video_like_counts(&self.store, &video_ids).await?;

        Ok(ChannelStats {
            total_subscribers,
            total_likes: like_counts.values().sum(),
            total_views: videos.iter().map(|v| v.views).sum(),
            total_videos: videos.len() as u64,
        })
    }

    /// The viewer's uploads with per-video like counts, newest first.
    pub async fn channel_videos(&self, viewer: Viewer) -> ApiResult<Vec<ChannelVideo>> {
        let videos = self
            .store
            .videos
            .find(
                &VideoFilter {
                    owner: Some(viewer.id),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;
        let video_ids: Vec<ObjectId> = videos.iter().map(|v| v.id).collect();
        let like_counts = stages::video_like_counts(&self.store, &video_ids).await?;

        Ok(videos
            .iter()
            .map(|video| ChannelVideo {
                id: video.id,
                title: video.title.clone(),
                description: video.description.clone(),
                thumbnail: video.thumbnail.clone(),
                published: video.published,
                views: video.views,
                likes_count: like_counts.get(&video.id).copied().unwrap_or(0),
                created_at: video.created_at,
            })
            .collect())
    }
}
