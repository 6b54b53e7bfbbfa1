//! Integration tests for the video feed and watch-page pipelines

mod support;

use anyhow::Result;
use api::error::ApiError;
use api::models::VideoSortKey;
use api::services::ListVideosQuery;
use api::store::Direction;
use support::{TestApp, seed_user, seed_video, viewer_of};

#[tokio::test]
async fn test_feed_shows_published_only_with_owner_details() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    seed_video(&app.store, alice.id, "published clip", true, 10).await;
    seed_video(&app.store, alice.id, "draft clip", false, 5).await;

    let page = app
        .videos
        .list_videos(ListVideosQuery::default(), None)
        .await?;

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].title, "published clip");
    let owner = page.items[0].owner_details.as_ref().expect("owner attached");
    assert_eq!(owner.username, "alice");
    Ok(())
}

#[tokio::test]
async fn test_feed_default_sort_is_newest_first() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    seed_video(&app.store, alice.id, "oldest", true, 300).await;
    seed_video(&app.store, alice.id, "newest", true, 10).await;
    seed_video(&app.store, alice.id, "middle", true, 100).await;

    let page = app
        .videos
        .list_videos(ListVideosQuery::default(), None)
        .await?;

    let titles: Vec<&str> = page.items.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, ["newest", "middle", "oldest"]);
    Ok(())
}

#[tokio::test]
async fn test_feed_search_is_case_insensitive_substring() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    seed_video(&app.store, alice.id, "Rust Tutorial Part 1", true, 30).await;
    seed_video(&app.store, alice.id, "cooking show", true, 20).await;

    let page = app
        .videos
        .list_videos(
            ListVideosQuery {
                query: Some("rust tut".into()),
                ..Default::default()
            },
            None,
        )
        .await?;

    assert_eq!(page.total_items, 1);
    assert_eq!(page.items[0].title, "Rust Tutorial Part 1");
    Ok(())
}

#[tokio::test]
async fn test_feed_owner_filter_and_sort_by_views() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let low = seed_video(&app.store, alice.id, "low", true, 30).await;
    let high = seed_video(&app.store, alice.id, "high", true, 20).await;
    seed_video(&app.store, bob.id, "other channel", true, 10).await;

    // Direct store writes to set up the counters.
    use api::models::VideoPatch;
    app.store
        .videos
        .update_by_id(low.id, &VideoPatch { views: Some(2) })
        .await?;
    app.store
        .videos
        .update_by_id(high.id, &VideoPatch { views: Some(50) })
        .await?;

    let page = app
        .videos
        .list_videos(
            ListVideosQuery {
                user_id: Some(alice.id.to_hex()),
                sort_by: Some(VideoSortKey::Views),
                sort_type: Some(Direction::Desc),
                ..Default::default()
            },
            None,
        )
        .await?;

    let titles: Vec<&str> = page.items.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, ["high", "low"]);
    Ok(())
}

#[tokio::test]
async fn test_feed_pagination_bounds() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    for i in 0..23 {
        seed_video(&app.store, alice.id, &format!("clip {i}"), true, i).await;
    }

    for page_no in 1..=4u32 {
        let page = app
            .videos
            .list_videos(
                ListVideosQuery {
                    page: Some(page_no),
                    limit: Some(10),
                    ..Default::default()
                },
                None,
            )
            .await?;
        assert!(page.items.len() <= 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.is_empty(), page_no as u64 > page.total_pages);
    }
    Ok(())
}

#[tokio::test]
async fn test_feed_rejects_zero_page_and_bad_owner_id() {
    let app = TestApp::new();

    let err = app
        .videos
        .list_videos(
            ListVideosQuery {
                page: Some(0),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(_)));

    let err = app
        .videos
        .list_videos(
            ListVideosQuery {
                user_id: Some("not-an-id".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn test_get_video_increments_views_exactly_once_per_call() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let video = seed_video(&app.store, alice.id, "clip", true, 10).await;

    let first = app
        .videos
        .get_video(&video.id.to_hex(), Some(viewer_of(&bob)))
        .await?;
    let second = app
        .videos
        .get_video(&video.id.to_hex(), Some(viewer_of(&bob)))
        .await?;

    assert_eq!(first.views, 1);
    assert_eq!(second.views, 2);

    let stored = app.store.videos.find_by_id(video.id).await?.unwrap();
    assert_eq!(stored.views, 2);
    Ok(())
}

#[tokio::test]
async fn test_get_video_detail_fields() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let carol = seed_user(&app.store, "carol").await;
    let video = seed_video(&app.store, alice.id, "clip", true, 10).await;

    app.subscriptions
        .toggle_subscription(&alice.id.to_hex(), viewer_of(&bob))
        .await?;
    app.likes
        .toggle_video_like(&video.id.to_hex(), viewer_of(&carol))
        .await?;
    app.likes
        .toggle_video_like(&video.id.to_hex(), viewer_of(&bob))
        .await?;

    let detail = app
        .videos
        .get_video(&video.id.to_hex(), Some(viewer_of(&bob)))
        .await?;

    assert_eq!(detail.likes_count, 2);
    assert!(detail.is_liked);
    let owner = detail.owner.expect("owner attached");
    assert_eq!(owner.username, "alice");
    assert_eq!(owner.subscribers_count, 1);
    assert!(owner.is_subscribed);

    // Anonymous viewer: flags false, no error.
    let anon = app.videos.get_video(&video.id.to_hex(), None).await?;
    assert!(!anon.is_liked);
    assert!(!anon.owner.unwrap().is_subscribed);
    Ok(())
}

#[tokio::test]
async fn test_get_video_missing_and_malformed() {
    let app = TestApp::new();

    let err = app
        .videos
        .get_video(&common::id::ObjectId::generate().to_hex(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound("video")));

    let err = app.videos.get_video("bogus", None).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidIdentifier(_)));
}

#[tokio::test]
async fn test_watch_history_front_append_without_reorder() -> Result<()> {
    let app = TestApp::new();
    let alice = seed_user(&app.store, "alice").await;
    let bob = seed_user(&app.store, "bob").await;
    let first = seed_video(&app.store, alice.id, "first watched", true, 30).await;
    let second = seed_video(&app.store, alice.id, "second watched", true, 20).await;

    let viewer = viewer_of(&bob);
    app.videos.get_video(&first.id.to_hex(), Some(viewer)).await?;
    app.videos.get_video(&second.id.to_hex(), Some(viewer)).await?;
    // Rewatch: the existing entry must not move to the front.
    app.videos.get_video(&first.id.to_hex(), Some(viewer)).await?;

    let history = app.videos.watch_history(viewer).await?;
    let titles: Vec<&str> = history.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, ["second watched", "first watched"]);
    Ok(())
}

/// End-to-end scenario from the acceptance checklist.
#[tokio::test]
async fn test_publish_browse_watch_like_flow() -> Result<()> {
    let app = TestApp::new();
    let a = seed_user(&app.store, "creator").await;
    let b = seed_user(&app.store, "watcher").await;
    let video = seed_video(&app.store, a.id, "the clip", true, 10).await;

    // B browses the feed and sees A's video.
    let page = app
        .videos
        .list_videos(ListVideosQuery::default(), Some(viewer_of(&b)))
        .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(
        page.items[0].owner_details.as_ref().unwrap().username,
        "creator"
    );

    // B watches twice; the counter moves by exactly two.
    app.videos
        .get_video(&video.id.to_hex(), Some(viewer_of(&b)))
        .await?;
    app.videos
        .get_video(&video.id.to_hex(), Some(viewer_of(&b)))
        .await?;
    let stored = app.store.videos.find_by_id(video.id).await?.unwrap();
    assert_eq!(stored.views, 2);

    // B likes, then unlikes.
    assert!(
        app.likes
            .toggle_video_like(&video.id.to_hex(), viewer_of(&b))
            .await?
    );
    let liked = app.likes.list_liked_videos(viewer_of(&b)).await?;
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].id, video.id);

    assert!(
        !app.likes
            .toggle_video_like(&video.id.to_hex(), viewer_of(&b))
            .await?
    );
    assert!(app.likes.list_liked_videos(viewer_of(&b)).await?.is_empty());
    Ok(())
}
