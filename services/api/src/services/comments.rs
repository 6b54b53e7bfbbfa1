//! Comment feed pipeline

use common::config::PaginationConfig;
use common::id::ObjectId;
use common::page::{Page, PageRequest};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::models::{CommentFilter, CommentSortKey, Viewer};
use crate::pipeline::{paginate, stages};
use crate::store::{Direction, Order, Store};
use crate::views::CommentSummary;

/// Query parameters of a video's comment feed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_type: Option<Direction>,
}

/// Composes the paginated comment feed of a video.
#[derive(Clone)]
pub struct CommentService {
    store: Store,
    pagination: PaginationConfig,
}

impl CommentService {
    pub fn new(store: Store, pagination: PaginationConfig) -> Self {
        Self { store, pagination }
    }

    /// Comments of one video with owner summary, like count, and the
    /// viewer's like flag, ordered by creation time.
    pub async fn list_comments(
        &self,
        video_id: &str,
        query: ListCommentsQuery,
        viewer: Option<Viewer>,
    ) -> ApiResult<Page<CommentSummary>> {
        let video_id = ObjectId::parse(video_id)?;
        let request = PageRequest::new(query.page, query.limit, &self.pagination)?;

        self.store
            .videos
            .find_by_id(video_id)
            .await?
            .ok_or(ApiError::NotFound("video"))?;

        let filter = CommentFilter {
            video: Some(video_id),
        };
        let order = Order {
            key: CommentSortKey::CreatedAt,
            direction: query.sort_type.unwrap_or_default(),
        };
        let page = paginate(self.store.comments.as_ref(), &filter, order, &request).await?;

        let comment_ids: Vec<ObjectId> = page.items.iter().map(|c| c.id).collect();
        let owners =
            stages::owner_summaries(&self.store, page.items.iter().map(|c| c.owner)).await?;
        let like_counts = stages::comment_like_counts(&self.store, &comment_ids).await?;
        let liked = stages::viewer_comment_likes(&self.store, viewer, &comment_ids).await?;

        let items = page
            .items
            .iter()
            .map(|comment| {
                CommentSummary::new(
                    comment,
                    owners.get(&comment.owner).cloned(),
                    like_counts.get(&comment.id).copied().unwrap_or(0),
                    liked.contains(&comment.id),
                )
            })
            .collect();

        Ok(page.with_items(items))
    }
}
