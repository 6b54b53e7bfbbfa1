//! Shared fixtures for the integration suites
#![allow(dead_code)]

use chrono::{Duration, Utc};
use common::config::PaginationConfig;
use common::id::ObjectId;

use api::models::{User, Video, Viewer};
use api::services::{
    ChannelService, CommentService, DashboardService, LikeService, PlaylistService,
    SubscriptionService, VideoService,
};
use api::store::Store;

/// Every service wired over one shared in-memory store.
pub struct TestApp {
    pub store: Store,
    pub videos: VideoService,
    pub comments: CommentService,
    pub channels: ChannelService,
    pub likes: LikeService,
    pub subscriptions: SubscriptionService,
    pub playlists: PlaylistService,
    pub dashboard: DashboardService,
}

impl TestApp {
    pub fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .try_init();

        let store = Store::in_memory();
        let pagination = PaginationConfig::default();
        Self {
            videos: VideoService::new(store.clone(), pagination.clone()),
            comments: CommentService::new(store.clone(), pagination),
            channels: ChannelService::new(store.clone()),
            likes: LikeService::new(store.clone()),
            subscriptions: SubscriptionService::new(store.clone()),
            playlists: PlaylistService::new(store.clone()),
            dashboard: DashboardService::new(store.clone()),
            store,
        }
    }
}

pub async fn seed_user(store: &Store, username: &str) -> User {
    let user = User::new(
        username,
        format!("{username}@example.com"),
        format!("{username} name"),
        "argon2-hash",
    );
    store.users.insert(user.clone()).await.expect("insert user");
    user
}

/// Insert a video backdated by `age_secs` so ordering tests are
/// deterministic regardless of clock resolution.
pub async fn seed_video(
    store: &Store,
    owner: ObjectId,
    title: &str,
    published: bool,
    age_secs: i64,
) -> Video {
    let mut video = Video::new(owner, title, "description", "video.mp4", "thumb.png", 120.0);
    video.published = published;
    video.created_at = Utc::now() - Duration::seconds(age_secs);
    video.updated_at = video.created_at;
    store
        .videos
        .insert(video.clone())
        .await
        .expect("insert video");
    video
}

pub fn viewer_of(user: &User) -> Viewer {
    Viewer::new(user.id)
}
