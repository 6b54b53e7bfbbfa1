//! Query pipeline building blocks
//!
//! A pipeline is a fixed, hand-composed sequence: a match/sort/window pass
//! pushed down to the store, then the join stages from [`stages`], then the
//! projection into a view type. The stage order is fixed per use case so a
//! projection can only reference fields an earlier stage produced.

pub mod stages;

use common::page::{Page, PageRequest};

use crate::error::ApiResult;
use crate::store::{Collection, Document, Order, Window};

/// Execute the count pass plus the skip/limit pass for a listing pipeline.
///
/// Ordering is fully determined before the window is applied (the store
/// sorts first, ties break by insertion order). A page beyond the last one
/// comes back with empty items and intact metadata, not an error.
pub async fn paginate<T: Document>(
    collection: &dyn Collection<T>,
    filter: &T::Filter,
    order: Order<T::SortKey>,
    request: &PageRequest,
) -> ApiResult<Page<T>> {
    let total_items = collection.count(filter).await?;
    let window = Window {
        skip: request.offset(),
        limit: request.limit() as u64,
    };
    let items = collection.find(filter, order, Some(window)).await?;

    Ok(Page::new(items, total_items, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::PaginationConfig;
    use common::id::ObjectId;

    use crate::models::{Video, VideoFilter};
    use crate::store::memory::MemoryCollection;

    async fn collection_with(n: usize) -> MemoryCollection<Video> {
        let owner = ObjectId::generate();
        let col = MemoryCollection::new();
        for i in 0..n {
            col.insert(Video::new(owner, format!("video {i}"), "d", "v", "t", 1.0))
                .await
                .unwrap();
        }
        col
    }

    #[tokio::test]
    async fn test_window_never_exceeds_limit() {
        let col = collection_with(23).await;
        let cfg = PaginationConfig::default();

        for page in 1..=4u32 {
            let request = PageRequest::new(Some(page), Some(10), &cfg).unwrap();
            let result = paginate(&col, &VideoFilter::default(), Order::default(), &request)
                .await
                .unwrap();
            assert!(result.items.len() <= 10);
            assert_eq!(result.total_items, 23);
            assert_eq!(result.total_pages, 3);
            // Empty exactly when the page is past the end.
            assert_eq!(result.items.is_empty(), page as u64 > result.total_pages);
        }
    }

    #[tokio::test]
    async fn test_last_page_is_partial() {
        let col = collection_with(23).await;
        let cfg = PaginationConfig::default();
        let request = PageRequest::new(Some(3), Some(10), &cfg).unwrap();

        let result = paginate(&col, &VideoFilter::default(), Order::default(), &request)
            .await
            .unwrap();
        assert_eq!(result.items.len(), 3);
        assert!(!result.has_next_page);
        assert!(result.has_prev_page);
    }
}
