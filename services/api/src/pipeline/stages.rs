//! Join-stage library
//!
//! Reusable building blocks the pipeline composers assemble: attach a
//! single owner by id, attach a count of related rows, attach a
//! presence-of-relation flag for the current viewer. Each stage is one
//! store round-trip for the whole batch and keys its results per parent id,
//! so derived fields never leak across rows.

use std::collections::{HashMap, HashSet};

use common::id::ObjectId;

use crate::error::ApiResult;
use crate::models::{LikeFilter, SubscriptionFilter, UserFilter, Viewer};
use crate::store::{Collection, Document, Order, Store};
use crate::views::UserSummary;

/// Attach-one stage: resolve foreign-key user ids to public user summaries.
///
/// Ids with no matching user row are simply absent from the map; the
/// projection turns that into a null owner, never an error.
pub async fn owner_summaries(
    store: &Store,
    owner_ids: impl IntoIterator<Item = ObjectId>,
) -> ApiResult<HashMap<ObjectId, UserSummary>> {
    let ids = dedup(owner_ids);
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = store
        .users
        .find(
            &UserFilter {
                ids: Some(ids),
                ..Default::default()
            },
            Order::default(),
            None,
        )
        .await?;

    Ok(users
        .iter()
        .map(|user| (user.id, UserSummary::from(user)))
        .collect())
}

/// Related-count stage: count rows of a relation grouped by the parent id
/// the `related_key` extracts. Parents with no related rows are absent from
/// the map, which projects as zero.
pub async fn related_counts<R>(
    collection: &dyn Collection<R>,
    filter: &R::Filter,
    related_key: impl Fn(&R) -> Option<ObjectId>,
) -> ApiResult<HashMap<ObjectId, u64>>
where
    R: Document,
    R::SortKey: Default,
{
    let rows = collection.find(filter, Order::default(), None).await?;

    let mut counts: HashMap<ObjectId, u64> = HashMap::new();
    for row in &rows {
        if let Some(parent) = related_key(row) {
            *counts.entry(parent).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

/// Viewer-flag stage: the set of parent ids for which a relation row of the
/// current viewer exists. An anonymous viewer yields the empty set, so
/// every flag projects as false; never an error.
pub async fn presence_flags<R>(
    collection: &dyn Collection<R>,
    viewer: Option<Viewer>,
    filter_for: impl FnOnce(ObjectId) -> R::Filter,
    related_key: impl Fn(&R) -> Option<ObjectId>,
) -> ApiResult<HashSet<ObjectId>>
where
    R: Document,
    R::SortKey: Default,
{
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };

    let rows = collection
        .find(&filter_for(viewer.id), Order::default(), None)
        .await?;

    Ok(rows.iter().filter_map(&related_key).collect())
}

/// Like counts per video id.
pub async fn video_like_counts(
    store: &Store,
    video_ids: &[ObjectId],
) -> ApiResult<HashMap<ObjectId, u64>> {
    if video_ids.is_empty() {
        return Ok(HashMap::new());
    }
    related_counts(
        store.likes.as_ref(),
        &LikeFilter {
            video_in: Some(video_ids.to_vec()),
            ..Default::default()
        },
        |like| like.video(),
    )
    .await
}

/// Like counts per comment id.
pub async fn comment_like_counts(
    store: &Store,
    comment_ids: &[ObjectId],
) -> ApiResult<HashMap<ObjectId, u64>> {
    if comment_ids.is_empty() {
        return Ok(HashMap::new());
    }
    related_counts(
        store.likes.as_ref(),
        &LikeFilter {
            comment_in: Some(comment_ids.to_vec()),
            ..Default::default()
        },
        |like| like.comment(),
    )
    .await
}

/// Subscriber counts per channel id.
pub async fn subscriber_counts(
    store: &Store,
    channel_ids: &[ObjectId],
) -> ApiResult<HashMap<ObjectId, u64>> {
    if channel_ids.is_empty() {
        return Ok(HashMap::new());
    }
    related_counts(
        store.subscriptions.as_ref(),
        &SubscriptionFilter {
            channel_in: Some(channel_ids.to_vec()),
            ..Default::default()
        },
        |sub| Some(sub.channel),
    )
    .await
}

/// Video ids among `video_ids` the viewer has liked.
pub async fn viewer_video_likes(
    store: &Store,
    viewer: Option<Viewer>,
    video_ids: &[ObjectId],
) -> ApiResult<HashSet<ObjectId>> {
    if video_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids = video_ids.to_vec();
    presence_flags(
        store.likes.as_ref(),
        viewer,
        move |viewer_id| LikeFilter {
            liked_by: Some(viewer_id),
            video_in: Some(ids),
            ..Default::default()
        },
        |like| like.video(),
    )
    .await
}

/// Comment ids among `comment_ids` the viewer has liked.
pub async fn viewer_comment_likes(
    store: &Store,
    viewer: Option<Viewer>,
    comment_ids: &[ObjectId],
) -> ApiResult<HashSet<ObjectId>> {
    if comment_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids = comment_ids.to_vec();
    presence_flags(
        store.likes.as_ref(),
        viewer,
        move |viewer_id| LikeFilter {
            liked_by: Some(viewer_id),
            comment_in: Some(ids),
            ..Default::default()
        },
        |like| like.comment(),
    )
    .await
}

/// Channel ids among `channel_ids` the viewer is subscribed to.
pub async fn viewer_subscriptions(
    store: &Store,
    viewer: Option<Viewer>,
    channel_ids: &[ObjectId],
) -> ApiResult<HashSet<ObjectId>> {
    if channel_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids = channel_ids.to_vec();
    presence_flags(
        store.subscriptions.as_ref(),
        viewer,
        move |viewer_id| SubscriptionFilter {
            subscriber: Some(viewer_id),
            channel_in: Some(ids),
            ..Default::default()
        },
        |sub| Some(sub.channel),
    )
    .await
}

fn dedup(ids: impl IntoIterator<Item = ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Like, LikeTarget, Subscription, User};

    fn user(username: &str) -> User {
        User::new(
            username,
            format!("{username}@example.com"),
            username.to_uppercase(),
            "hash",
        )
    }

    #[tokio::test]
    async fn test_owner_summaries_skips_absent_rows() {
        let store = Store::in_memory();
        let alice = user("alice");
        store.users.insert(alice.clone()).await.unwrap();
        let ghost = ObjectId::generate();

        let summaries = owner_summaries(&store, [alice.id, ghost, alice.id])
            .await
            .unwrap();

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[&alice.id].username, "alice");
        assert!(!summaries.contains_key(&ghost));
    }

    #[tokio::test]
    async fn test_counts_do_not_leak_across_rows() {
        let store = Store::in_memory();
        let channel_a = ObjectId::generate();
        let channel_b = ObjectId::generate();

        for _ in 0..3 {
            store
                .subscriptions
                .insert(Subscription::new(ObjectId::generate(), channel_a))
                .await
                .unwrap();
        }
        store
            .subscriptions
            .insert(Subscription::new(ObjectId::generate(), channel_b))
            .await
            .unwrap();

        let counts = subscriber_counts(&store, &[channel_a, channel_b])
            .await
            .unwrap();
        assert_eq!(counts.get(&channel_a), Some(&3));
        assert_eq!(counts.get(&channel_b), Some(&1));
    }

    #[tokio::test]
    async fn test_anonymous_viewer_has_no_flags() {
        let store = Store::in_memory();
        let video = ObjectId::generate();
        store
            .likes
            .insert(Like::new(LikeTarget::Video(video), ObjectId::generate()))
            .await
            .unwrap();

        let flags = viewer_video_likes(&store, None, &[video]).await.unwrap();
        assert!(flags.is_empty());
    }

    #[tokio::test]
    async fn test_viewer_flags_scoped_to_viewer() {
        let store = Store::in_memory();
        let viewer = Viewer::new(ObjectId::generate());
        let liked = ObjectId::generate();
        let unliked = ObjectId::generate();

        store
            .likes
            .insert(Like::new(LikeTarget::Video(liked), viewer.id))
            .await
            .unwrap();
        store
            .likes
            .insert(Like::new(LikeTarget::Video(unliked), ObjectId::generate()))
            .await
            .unwrap();

        let flags = viewer_video_likes(&store, Some(viewer), &[liked, unliked])
            .await
            .unwrap();
        assert!(flags.contains(&liked));
        assert!(!flags.contains(&unliked));
    }
}
