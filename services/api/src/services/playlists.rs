//! Playlist pipelines and ordered-set mutations

use common::id::ObjectId;

use crate::error::{ApiError, ApiResult};
use crate::models::{Playlist, PlaylistFilter, PlaylistPatch, VideoFilter, Viewer};
use crate::pipeline::stages;
use crate::store::{Order, Store};
use crate::views::{PlaylistDetail, PlaylistSummary, VideoSummary};

/// Composes playlist views and the add/remove-video mutations.
#[derive(Clone)]
pub struct PlaylistService {
    store: Store,
}

impl PlaylistService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Owner-only detail view: the playlist's published videos in playlist
    /// order, owner summary, and aggregate video count and view total.
    ///
    /// The ownership check runs on the playlist document alone, before any
    /// join work.
    pub async fn get_playlist_detail(
        &self,
        playlist_id: &str,
        viewer: Viewer,
    ) -> ApiResult<PlaylistDetail> {
        let playlist_id = ObjectId::parse(playlist_id)?;

        let playlist = self
            .store
            .playlists
            .find_by_id(playlist_id)
            .await?
            .ok_or(ApiError::NotFound("playlist"))?;
        if playlist.owner != viewer.id {
            return Err(ApiError::Forbidden("only the playlist owner may view it"));
        }

        let videos = if playlist.videos.is_empty() {
            Vec::new()
        } else {
            self.store
                .videos
                .find(
                    &VideoFilter {
                        ids: Some(playlist.videos.clone()),
                        published: Some(true),
                        ..Default::default()
                    },
                    Order::default(),
                    None,
                )
                .await?
        };
        let owners = stages::owner_summaries(&self.store, [playlist.owner]).await?;

        // Project in playlist order; unpublished and deleted entries are
        // invisible here and excluded from the aggregates.
        let mut items = Vec::with_capacity(videos.len());
        for id in &playlist.videos {
            if let Some(video) = videos.iter().find(|v| v.id == *id) {
                items.push(VideoSummary::new(video, None));
            }
        }
        let total_views = items.iter().map(|v| v.views).sum();

        Ok(PlaylistDetail {
            id: playlist.id,
            name: playlist.name,
            description: playlist.description,
            created_at: playlist.created_at,
            updated_at: playlist.updated_at,
            total_videos: items.len() as u64,
            total_views,
            owner: owners.get(&playlist.owner).cloned(),
            videos: items,
        })
    }

    /// A user's playlists with per-playlist aggregates. An empty list is a
    /// valid result.
    pub async fn list_user_playlists(&self, user_id: &str) -> ApiResult<Vec<PlaylistSummary>> {
        let user_id = ObjectId::parse(user_id)?;
        self.store
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound("user"))?;

        let playlists = self
            .store
            .playlists
            .find(
                &PlaylistFilter {
                    owner: Some(user_id),
                },
                Order::default(),
                None,
            )
            .await?;

        // One videos pass for all playlists, then per-playlist aggregation.
        let all_ids: Vec<ObjectId> = playlists
            .iter()
            .flat_map(|playlist| playlist.videos.iter().copied())
            .collect();
        let videos = if all_ids.is_empty() {
            Vec::new()
        } else {
            self.store
                .videos
                .find(
                    &VideoFilter {
                        ids: Some(all_ids),
                        ..Default::default()
                    },
                    Order::default(),
                    None,
                )
                .await?
        };

        Ok(playlists
            .iter()
            .map(|playlist| {
                let joined: Vec<_> = playlist
                    .videos
                    .iter()
                    .filter_map(|id| videos.iter().find(|v| v.id == *id))
                    .collect();
                PlaylistSummary {
                    id: playlist.id,
                    name: playlist.name.clone(),
                    description: playlist.description.clone(),
                    total_videos: joined.len() as u64,
                    total_views: joined.iter().map(|v| v.views).sum(),
                    updated_at: playlist.updated_at,
                }
            })
            .collect())
    }

    /// Add a video to the playlist's ordered set. Adding a video that is
    /// already present is a no-op, not an error.
    pub async fn add_video(
        &self,
        playlist_id: &str,
        video_id: &str,
        viewer: Viewer,
    ) -> ApiResult<()> {
        let (playlist, video_id) = self.load_for_mutation(playlist_id, video_id, viewer).await?;

        if playlist.videos.contains(&video_id) {
            return Ok(());
        }

        let mut videos = playlist.videos;
        videos.push(video_id);
        self.store
            .playlists
            .update_by_id(
                playlist.id,
                &PlaylistPatch {
                    videos: Some(videos),
                },
            )
            .await?;
        Ok(())
    }

    /// Remove a video from the playlist. Removing a video that is not in
    /// the playlist fails with NotFound.
    pub async fn remove_video(
        &self,
        playlist_id: &str,
        video_id: &str,
        viewer: Viewer,
    ) -> ApiResult<()> {
        let (playlist, video_id) = self.load_for_mutation(playlist_id, video_id, viewer).await?;

        if !playlist.videos.contains(&video_id) {
            return Err(ApiError::NotFound("video in playlist"));
        }

        let videos: Vec<ObjectId> = playlist
            .videos
            .into_iter()
            .filter(|id| *id != video_id)
            .collect();
        self.store
            .playlists
            .update_by_id(
                playlist.id,
                &PlaylistPatch {
                    videos: Some(videos),
                },
            )
            .await?;
        Ok(())
    }

    /// Shared mutation preamble: validate ids, confirm both entities
    /// exist, then authorize, in that order.
    async fn load_for_mutation(
        &self,
        playlist_id: &str,
        video_id: &str,
        viewer: Viewer,
    ) -> ApiResult<(Playlist, ObjectId)> {
        let playlist_id = ObjectId::parse(playlist_id)?;
        let video_id = ObjectId::parse(video_id)?;

        let playlist = self
            .store
            .playlists
            .find_by_id(playlist_id)
            .await?
            .ok_or(ApiError::NotFound("playlist"))?;
        self.store
            .videos
            .find_by_id(video_id)
            .await?
            .ok_or(ApiError::NotFound("video"))?;

        if playlist.owner != viewer.id {
            return Err(ApiError::Forbidden("only the playlist owner may edit it"));
        }

        Ok((playlist, video_id))
    }
}
