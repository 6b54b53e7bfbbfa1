//! Pipeline composers, one per read use case
//!
//! Each service owns the fixed stage order for its views: validate
//! identifiers, match/sort/window against the store, run the join stages,
//! project into the response shape. Services hold a [`crate::store::Store`]
//! handle and pagination config passed in at construction; there is no
//! ambient global state.

pub mod channels;
pub mod comments;
pub mod dashboard;
pub mod likes;
pub mod playlists;
pub mod subscriptions;
pub mod videos;

pub use channels::ChannelService;
pub use comments::{CommentService, ListCommentsQuery};
pub use dashboard::DashboardService;
pub use likes::LikeService;
pub use playlists::PlaylistService;
pub use subscriptions::SubscriptionService;
pub use videos::{ListVideosQuery, VideoService};
