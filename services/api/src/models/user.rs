//! User model and related functionality

use chrono::{DateTime, Utc};
use common::id::ObjectId;
use serde::Deserialize;
use std::cmp::Ordering;

use crate::store::Document;

/// User entity
///
/// `watch_history` is most-recent-first and duplicate-free; rewatching a
/// video does not move its existing entry to the front.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
    pub password_hash: String,
    pub refresh_token: Option<String>,
    pub watch_history: Vec<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::generate(),
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
            avatar: None,
            cover_image: None,
            password_hash: password_hash.into(),
            refresh_token: None,
            watch_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Filter over the users collection
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub ids: Option<Vec<ObjectId>>,
    /// Case-insensitive exact username match
    pub username: Option<String>,
}

/// Sortable user fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UserSortKey {
    #[default]
    CreatedAt,
}

/// Fields of a user this core is allowed to update
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub watch_history: Option<Vec<ObjectId>>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";

    type Filter = UserFilter;
    type SortKey = UserSortKey;
    type Patch = UserPatch;

    fn id(&self) -> ObjectId {
        self.id
    }

    fn matches(&self, filter: &Self::Filter) -> bool {
        if let Some(ids) = &filter.ids {
            if !ids.contains(&self.id) {
                return false;
            }
        }
        if let Some(username) = &filter.username {
            if !self.username.eq_ignore_ascii_case(username) {
                return false;
            }
        }
        true
    }

    fn sort_cmp(&self, other: &Self, key: Self::SortKey) -> Ordering {
        match key {
            UserSortKey::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn apply(&mut self, patch: &Self::Patch) {
        if let Some(history) = &patch.watch_history {
            self.watch_history = history.clone();
        }
        self.updated_at = Utc::now();
    }

    fn conflict(&self, other: &Self) -> Option<String> {
        if self.username.eq_ignore_ascii_case(&other.username) {
            return Some(format!("username {:?} is taken", other.username));
        }
        if self.email.eq_ignore_ascii_case(&other.email) {
            return Some(format!("email {:?} is taken", other.email));
        }
        None
    }
}
