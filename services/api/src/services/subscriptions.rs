//! Subscription toggle

use common::error::StoreError;
use common::id::ObjectId;

use crate::error::{ApiError, ApiResult};
use crate::models::{Subscription, SubscriptionFilter, Viewer};
use crate::store::Store;

/// Composes the subscribe/unsubscribe toggle.
#[derive(Clone)]
pub struct SubscriptionService {
    store: Store,
}

impl SubscriptionService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Toggle the viewer's subscription to a channel. Returns the
    /// resulting state: true when the viewer is now subscribed.
    ///
    /// Subscribing to one's own channel is rejected.
    pub async fn toggle_subscription(&self, channel_id: &str, viewer: Viewer) -> ApiResult<bool> {
        let channel_id = ObjectId::parse(channel_id)?;
        if channel_id == viewer.id {
            return Err(ApiError::Validation(
                "cannot subscribe to your own channel".to_string(),
            ));
        }

        self.store
            .users
            .find_by_id(channel_id)
            .await?
            .ok_or(ApiError::NotFound("channel"))?;

        let filter = SubscriptionFilter {
            subscriber: Some(viewer.id),
            channel: Some(channel_id),
            ..Default::default()
        };
        if let Some(existing) = self.store.subscriptions.find_one(&filter).await? {
            self.store.subscriptions.delete_by_id(existing.id).await?;
            tracing::info!(subscriber = %viewer.id, channel = %channel_id, "unsubscribed");
            return Ok(false);
        }

        match self
            .store
            .subscriptions
            .insert(Subscription::new(viewer.id, channel_id))
            .await
        {
            Ok(_) => {
                tracing::info!(subscriber = %viewer.id, channel = %channel_id, "subscribed");
                Ok(true)
            }
            // A concurrent toggle already created the row; the subscribed
            // state stands.
            Err(StoreError::Duplicate { .. }) => {
                tracing::warn!(
                    subscriber = %viewer.id,
                    channel = %channel_id,
                    "duplicate subscription insert tolerated"
                );
                Ok(true)
            }
            Err(other) => Err(other.into()),
        }
    }
}
