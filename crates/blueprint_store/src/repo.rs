//! Repository interfaces.
//!
//! Storage is injected behind these traits: `SqliteStore` for the
//! persisted path, `MemoryStore` for tests and ephemeral runs. Handlers
//! hold `Arc<dyn ...>` and never see a concrete backend.

use anyhow::Result;
use async_trait::async_trait;
use blueprint_core::{Blueprint, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Blueprint / user repositories
// ============================================================================

#[async_trait]
pub trait BlueprintRepo: Send + Sync {
    /// Insert or fully replace a blueprint.
    async fn save(&self, owner: Uuid, blueprint: &Blueprint) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<Blueprint>>;
    /// Returns false if the id was unknown.
    async fn delete(&self, id: Uuid) -> Result<bool>;
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Blueprint>>;
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn upsert(&self, user: &User) -> Result<()>;
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;
    /// Set the follow edge to `following` and adjust both users' counters.
    /// Idempotent; returns the resulting state.
    async fn set_follow(&self, follower: Uuid, followee: Uuid, following: bool) -> Result<bool>;
}

// ============================================================================
// Community gallery
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Recent,
    /// Reaction count descending, ties by recency.
    Popular,
    /// Average node progress descending.
    Progress,
}

impl SortKey {
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "recent" => Some(SortKey::Recent),
            "popular" => Some(SortKey::Popular),
            "progress" => Some(SortKey::Progress),
            _ => None,
        }
    }
}

pub const DEFAULT_PAGE_LIMIT: usize = 20;
pub const MAX_PAGE_LIMIT: usize = 50;

#[derive(Debug, Clone, Default)]
pub struct CommunityQuery {
    pub category: Option<String>,
    pub sort: SortKey,
    pub limit: usize,
    pub offset: usize,
}

impl CommunityQuery {
    /// Effective page size: 0 means default, everything is capped.
    pub fn clamped_limit(&self) -> usize {
        if self.limit == 0 {
            DEFAULT_PAGE_LIMIT
        } else {
            self.limit.min(MAX_PAGE_LIMIT)
        }
    }
}

/// Typed contract for the gallery join: author, journal count, and reaction
/// count are explicit fields, not nested arrays to be indexed into.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityGoal {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub author: CommunityAuthor,
    pub node_count: i64,
    pub average_progress: f32,
    pub journal_count: i64,
    pub reaction_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityAuthor {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPage {
    pub goals: Vec<CommunityGoal>,
    /// True iff exactly `limit` rows were returned. When the total
    /// available is an exact multiple of the limit, the next page is
    /// empty — callers get one trailing empty page.
    pub has_more: bool,
}

#[async_trait]
pub trait CommunityRepo: Send + Sync {
    async fn list_public(&self, query: &CommunityQuery) -> Result<CommunityPage>;
    /// Toggle a reaction; returns true if the reaction now exists.
    async fn toggle_reaction(&self, goal_id: Uuid, user_id: Uuid, kind: &str) -> Result<bool>;
    async fn add_journal(&self, goal_id: Uuid, author: Uuid, body: &str) -> Result<i64>;
    async fn journal_count(&self, goal_id: Uuid) -> Result<i64>;
}
