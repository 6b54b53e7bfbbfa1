//! Channel profile and subscription-list pipelines

use common::id::ObjectId;

use crate::error::{ApiError, ApiResult};
use crate::models::{SubscriptionFilter, UserFilter, VideoFilter, Viewer};
use crate::pipeline::stages;
use crate::store::{Order, Store, Window};
use crate::validation::validate_username;
use crate::views::{ChannelProfile, ChannelSummary, SubscriberSummary, VideoSummary};

/// Composes channel-centric views: profile, subscriber list, subscribed-to
/// list.
#[derive(Clone)]
pub struct ChannelService {
    store: Store,
}

impl ChannelService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Channel profile by username (case-insensitive exact match), with
    /// subscriber count, subscribed-to count, and the viewer's
    /// subscription flag.
    pub async fn get_channel_profile(
        &self,
        username: &str,
        viewer: Option<Viewer>,
    ) -> ApiResult<ChannelProfile> {
        validate_username(username).map_err(ApiError::Validation)?;

        let user = self
            .store
            .users
            .find_one(&UserFilter {
                username: Some(username.trim().to_string()),
                ..Default::default()
            })
            .await?
            .ok_or(ApiError::NotFound("channel"))?;

        let subscribers_count = self
            .store
            .subscriptions
            .count(&SubscriptionFilter {
                channel: Some(user.id),
                ..Default::default()
            })
            .await?;
        let channels_subscribed_to_count = self
            .store
            .subscriptions
            .count(&SubscriptionFilter {
                subscriber: Some(user.id),
                ..Default::default()
            })
            .await?;
        let is_subscribed = stages::viewer_subscriptions(&self.store, viewer, &[user.id])
            .await?
            .contains(&user.id);

        Ok(ChannelProfile {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            email: user.email,
            avatar: user.avatar,
            cover_image: user.cover_image,
            subscribers_count,
            channels_subscribed_to_count,
            is_subscribed,
        })
    }

    /// Subscribers of a channel. Each row carries that subscriber's own
    /// subscriber count and whether the queried channel is subscribed back
    /// to it; the nested counts are computed per row and never shared.
    pub async fn list_channel_subscribers(
        &self,
        channel_id: &str,
    ) -> ApiResult<Vec<SubscriberSummary>> {
        let channel_id = ObjectId::parse(channel_id)?;
        self.store
            .users
            .find_by_id(channel_id)
            .await?
            .ok_or(ApiError::NotFound("channel"))?;

        let subscriptions = self
            .store
            .subscriptions
            .find(
                &SubscriptionFilter {
                    channel: Some(channel_id),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;
        let subscriber_ids: Vec<ObjectId> =
            subscriptions.iter().map(|sub| sub.subscriber).collect();

        let users = stages::owner_summaries(&self.store, subscriber_ids.iter().copied()).await?;
        let counts = stages::subscriber_counts(&self.store, &subscriber_ids).await?;
        // Reverse edges: which of these subscribers the channel follows.
        let followed_back = stages::viewer_subscriptions(
            &self.store,
            Some(Viewer::new(channel_id)),
            &subscriber_ids,
        )
        .await?;

        // Subscribers whose user row has vanished are dropped, matching the
        // join-then-unwind behavior of the underlying store.
        Ok(subscriptions
            .iter()
            .filter_map(|sub| {
                let user = users.get(&sub.subscriber)?;
                Some(SubscriberSummary {
                    id: user.id,
                    username: user.username.clone(),
                    full_name: user.full_name.clone(),
                    avatar: user.avatar.clone(),
                    subscribed_to_subscriber: followed_back.contains(&sub.subscriber),
                    subscribers_count: counts.get(&sub.subscriber).copied().unwrap_or(0),
                })
            })
            .collect())
    }

    /// Channels a user is subscribed to, each with its latest published
    /// upload.
    pub async fn list_subscribed_channels(
        &self,
        subscriber_id: &str,
    ) -> ApiResult<Vec<ChannelSummary>> {
        let subscriber_id = ObjectId::parse(subscriber_id)?;
        self.store
            .users
            .find_by_id(subscriber_id)
            .await?
            .ok_or(ApiError::NotFound("user"))?;

        let subscriptions = self
            .store
            .subscriptions
            .find(
                &SubscriptionFilter {
                    subscriber: Some(subscriber_id),
                    ..Default::default()
                },
                Order::default(),
                None,
            )
            .await?;
        let channel_ids: Vec<ObjectId> = subscriptions.iter().map(|sub| sub.channel).collect();
        let channels = stages::owner_summaries(&self.store, channel_ids.iter().copied()).await?;

        let mut summaries = Vec::with_capacity(subscriptions.len());
        for sub in &subscriptions {
            let Some(channel) = channels.get(&sub.channel) else {
                continue;
            };
            let latest = self
                .store
                .videos
                .find(
                    &VideoFilter {
                        owner: Some(sub.channel),
                        published: Some(true),
                        ..Default::default()
                    },
                    Order::default(),
                    Some(Window { skip: 0, limit: 1 }),
                )
                .await?;

            summaries.push(ChannelSummary {
                id: channel.id,
                username: channel.username.clone(),
                full_name: channel.full_name.clone(),
                avatar: channel.avatar.clone(),
                latest_video: latest.first().map(|video| VideoSummary::new(video, None)),
            });
        }
        Ok(summaries)
    }
}
