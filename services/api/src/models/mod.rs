//! Entity models persisted by the store
//!
//! Entities deliberately do not implement `Serialize`; everything that
//! leaves the core goes through the response shapes in [`crate::views`],
//! which never carry credential material.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod user;
pub mod video;

pub use comment::{Comment, CommentFilter, CommentSortKey};
pub use like::{Like, LikeFilter, LikeSortKey, LikeTarget};
pub use playlist::{Playlist, PlaylistFilter, PlaylistPatch, PlaylistSortKey};
pub use subscription::{Subscription, SubscriptionFilter, SubscriptionSortKey};
pub use user::{User, UserFilter, UserPatch, UserSortKey};
pub use video::{Video, VideoFilter, VideoPatch, VideoSortKey};

use common::id::ObjectId;

/// Verified identity of the caller, supplied by the authentication
/// collaborator. Every pipeline entry point takes it explicitly; `None`
/// means an anonymous caller and turns all personalized flags false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewer {
    pub id: ObjectId,
}

impl Viewer {
    pub fn new(id: ObjectId) -> Self {
        Self { id }
    }
}
