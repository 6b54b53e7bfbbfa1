//! Subscription model and related functionality

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::store::{Document, NoPatch};

/// Subscription entity: `subscriber` follows `channel`, both User ids.
/// The store enforces at most one row per (subscriber, channel) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: ObjectId,
    pub subscriber: ObjectId,
    pub channel: ObjectId,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn new(subscriber: ObjectId, channel: ObjectId) -> Self {
        Self {
            id: ObjectId::generate(),
            subscriber,
            channel,
            created_at: Utc::now(),
        }
    }
}

/// Filter over the subscriptions collection
#[derive(Debug, Clone, Default)]
pub struct SubscriptionFilter {
    pub subscriber: Option<ObjectId>,
    pub channel: Option<ObjectId>,
    pub channel_in: Option<Vec<ObjectId>>,
}

/// Sortable subscription fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionSortKey {
    #[default]
    CreatedAt,
}

impl Document for Subscription {
    const COLLECTION: &'static str = "subscriptions";

    type Filter = SubscriptionFilter;
    type SortKey = SubscriptionSortKey;
    type Patch = NoPatch;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        if let Some(subscriber) = filter.subscriber {
            if self.subscriber != subscriber {
                return false;
            }
        }
        if let Some(channel) = filter.channel {
            if self.channel != channel {
                return false;
            }
        }
        if let Some(channels) = &filter.channel_in {
            if !channels.contains(&self.channel) {
                return false;
            }
        }
        true
    }

    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            SubscriptionSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn apply(&mut self, _patch: &Self::Patch) {}

    fn conflict(&self, other: &Self) -> Option<String> {
        if self.subscriber == other.subscriber && self.channel == other.channel {
            return Some("already subscribed".to_string());
        }
        None
    }
}
