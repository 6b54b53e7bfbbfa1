//! Response shapes leaving the read-model core
//!
//! This is the final projection of every pipeline. The shapes below are the
//! only types the core serializes, and none of them carry `password_hash`
//! or `refresh_token`, so credential material cannot reach a response no
//! matter which pipeline produced the row.

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Serialize;

use crate::models::{Comment, User, Video};

/// Public fields of a user, attached wherever an owner is resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: ObjectId,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// One video in a feed or listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_details: Option<UserSummary>,
}

impl VideoSummary {
    pub fn new(video: &Video, owner_details: Option<UserSummary>) -> Self {
        Self {
            id: video.id,
            title: video.title.clone(),
            description: video.description.clone(),
            video_file: video.video_file.clone(),
            thumbnail: video.thumbnail.clone(),
            duration: video.duration,
            views: video.views,
            created_at: video.created_at,
            owner_details,
        }
    }
}

/// The owner block on a video detail: public fields plus the channel-level
/// derived fields the watch page shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoOwner {
    pub id: ObjectId,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub subscribers_count: u64,
    pub is_subscribed: bool,
}

/// Fully denormalized watch-page view of one video.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetail {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    pub views: u64,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub likes_count: u64,
    pub is_liked: bool,
    /// `None` when the owning user row is absent; never an error.
    pub owner: Option<VideoOwner>,
}

/// Channel profile view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    pub id: ObjectId,
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub subscribers_count: u64,
    pub channels_subscribed_to_count: u64,
    pub is_subscribed: bool,
}

/// One comment in a video's comment feed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSummary {
    pub id: ObjectId,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes_count: u64,
    pub is_liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
}

impl CommentSummary {
    pub fn new(
        comment: &Comment,
        owner: Option<UserSummary>,
        likes_count: u64,
        is_liked: bool,
    ) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            created_at: comment.created_at,
            likes_count,
            is_liked,
            owner,
        }
    }
}

/// One subscriber of a channel, with the reverse-edge flag and that
/// subscriber's own audience size.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberSummary {
    pub id: ObjectId,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    /// Whether the queried channel is itself subscribed to this subscriber.
    pub subscribed_to_subscriber: bool,
    pub subscribers_count: u64,
}

/// One channel a user is subscribed to, with its latest published upload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub id: ObjectId,
    pub username: String,
    pub full_name: String,
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_video: Option<VideoSummary>,
}

/// One playlist in a user's playlist listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub total_videos: u64,
    pub total_views: u64,
    pub updated_at: DateTime<Utc>,
}

/// Owner-only detail view of a playlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    pub id: ObjectId,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub total_videos: u64,
    pub total_views: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<UserSummary>,
    pub videos: Vec<VideoSummary>,
}

/// Aggregate stats for the viewer's own channel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_subscribers: u64,
    pub total_likes: u64,
    pub total_views: u64,
    pub total_videos: u64,
}

/// One upload in the owner dashboard, unpublished included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelVideo {
    pub id: ObjectId,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub published: bool,
    pub views: u64,
    pub likes_count: u64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        let mut user = User::new("alice", "alice@example.com", "Alice", "argon2-hash");
        user.refresh_token = Some("refresh-secret".into());
        user
    }

    #[test]
    fn test_user_summary_carries_public_fields_only() {
        let user = user();
        let summary = UserSummary::from(&user);
        let json = serde_json::to_string(&summary).expect("serialize");

        assert!(json.contains("\"username\":\"alice\""));
        assert!(!json.contains("argon2-hash"));
        assert!(!json.contains("refresh-secret"));
        assert!(!json.contains("passwordHash"));
        assert!(!json.contains("refreshToken"));
        assert!(!json.contains("email"));
    }

    #[test]
    fn test_video_detail_never_leaks_credentials() {
        let user = user();
        let video = Video::new(user.id, "title", "desc", "v.mp4", "t.png", 12.5);
        let detail = VideoDetail {
            id: video.id,
            title: video.title.clone(),
            description: video.description.clone(),
            video_file: video.video_file.clone(),
            thumbnail: video.thumbnail.clone(),
            duration: video.duration,
            views: video.views,
            published: video.published,
            created_at: video.created_at,
            likes_count: 3,
            is_liked: true,
            owner: Some(VideoOwner {
                id: user.id,
                username: user.username.clone(),
                full_name: user.full_name.clone(),
                avatar: user.avatar.clone(),
                subscribers_count: 7,
                is_subscribed: false,
            }),
        };

        let json = serde_json::to_string(&detail).expect("serialize");
        assert!(json.contains("\"likesCount\":3"));
        assert!(!json.contains("argon2-hash"));
        assert!(!json.contains("refresh-secret"));
    }

    #[test]
    fn test_feed_item_omits_absent_owner() {
        let video = Video::new(ObjectId::generate(), "t", "d", "v", "p", 1.0);
        let summary = VideoSummary::new(&video, None);
        let json = serde_json::to_string(&summary).expect("serialize");
        assert!(!json.contains("ownerDetails"));
    }
}
