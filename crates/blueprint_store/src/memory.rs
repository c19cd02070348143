//! In-memory store for tests and ephemeral runs.
//!
//! Implements the same repository traits as `SqliteStore` against a single
//! locked state struct. Semantics (sorting, pagination, toggle behavior)
//! must match the SQLite backend.

use crate::repo::{
    BlueprintRepo, CommunityAuthor, CommunityGoal, CommunityPage, CommunityQuery, CommunityRepo,
    SortKey, UserRepo,
};
use anyhow::Result;
use async_trait::async_trait;
use blueprint_core::{Blueprint, User, UserStats};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredBlueprint {
    owner: Uuid,
    blueprint: Blueprint,
}

#[derive(Debug, Clone)]
struct Journal {
    #[allow(dead_code)]
    id: i64,
    goal_id: Uuid,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    blueprints: HashMap<Uuid, StoredBlueprint>,
    journals: Vec<Journal>,
    next_journal_id: i64,
    /// (goal, user, kind)
    reactions: HashSet<(Uuid, Uuid, String)>,
    follows: HashSet<(Uuid, Uuid)>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlueprintRepo for MemoryStore {
    async fn save(&self, owner: Uuid, blueprint: &Blueprint) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.blueprints.insert(
            blueprint.id,
            StoredBlueprint {
                owner,
                blueprint: blueprint.clone(),
            },
        );
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Blueprint>> {
        let inner = self.inner.read().await;
        Ok(inner.blueprints.get(&id).map(|s| s.blueprint.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let removed = inner.blueprints.remove(&id).is_some();
        if removed {
            inner.journals.retain(|j| j.goal_id != id);
            inner.reactions.retain(|(goal, _, _)| *goal != id);
        }
        Ok(removed)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Blueprint>> {
        let inner = self.inner.read().await;
        let mut list: Vec<Blueprint> = inner
            .blueprints
            .values()
            .filter(|s| s.owner == owner)
            .map(|s| s.blueprint.clone())
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn upsert(&self, user: &User) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).cloned())
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.username == username).cloned())
    }

    async fn set_follow(&self, follower: Uuid, followee: Uuid, following: bool) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let key = (follower, followee);
        let changed = if following {
            inner.follows.insert(key)
        } else {
            inner.follows.remove(&key)
        };

        if changed {
            let bump = |stats: &mut UserStats, up: bool, side_follower: bool| {
                let field = if side_follower {
                    &mut stats.following
                } else {
                    &mut stats.followers
                };
                *field = if up {
                    *field + 1
                } else {
                    field.saturating_sub(1)
                };
            };
            if let Some(user) = inner.users.get_mut(&follower) {
                bump(&mut user.stats, following, true);
            }
            if let Some(user) = inner.users.get_mut(&followee) {
                bump(&mut user.stats, following, false);
            }
        }

        Ok(following)
    }
}

#[async_trait]
impl CommunityRepo for MemoryStore {
    async fn list_public(&self, query: &CommunityQuery) -> Result<CommunityPage> {
        let inner = self.inner.read().await;
        let limit = query.clamped_limit();

        let mut rows: Vec<(CommunityGoal, DateTime<Utc>)> = inner
            .blueprints
            .values()
            .filter(|s| s.blueprint.is_public)
            .filter(|s| match &query.category {
                Some(cat) => s.blueprint.category.as_deref() == Some(cat.as_str()),
                None => true,
            })
            .map(|s| {
                let bp = &s.blueprint;
                let author = inner.users.get(&s.owner);
                let reaction_count = inner
                    .reactions
                    .iter()
                    .filter(|(goal, _, _)| *goal == bp.id)
                    .count() as i64;
                let journal_count =
                    inner.journals.iter().filter(|j| j.goal_id == bp.id).count() as i64;
                let average_progress = if bp.nodes.is_empty() {
                    0.0
                } else {
                    bp.nodes.iter().map(|n| n.progress as f32).sum::<f32>()
                        / bp.nodes.len() as f32
                };
                let goal = CommunityGoal {
                    id: bp.id,
                    title: bp.title.clone(),
                    description: bp.description.clone(),
                    category: bp.category.clone(),
                    author: CommunityAuthor {
                        id: s.owner,
                        username: author.map(|u| u.username.clone()).unwrap_or_default(),
                        display_name: author.map(|u| u.display_name.clone()).unwrap_or_default(),
                    },
                    node_count: bp.nodes.len() as i64,
                    average_progress,
                    journal_count,
                    reaction_count,
                    created_at: bp.created_at,
                };
                (goal, bp.created_at)
            })
            .collect();

        match query.sort {
            SortKey::Recent => rows.sort_by(|a, b| b.1.cmp(&a.1)),
            SortKey::Popular => rows.sort_by(|a, b| {
                b.0.reaction_count
                    .cmp(&a.0.reaction_count)
                    .then(b.1.cmp(&a.1))
            }),
            SortKey::Progress => rows.sort_by(|a, b| {
                b.0.average_progress
                    .partial_cmp(&a.0.average_progress)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.1.cmp(&a.1))
            }),
        }

        let goals: Vec<CommunityGoal> = rows
            .into_iter()
            .map(|(goal, _)| goal)
            .skip(query.offset)
            .take(limit)
            .collect();

        let has_more = goals.len() == limit;
        Ok(CommunityPage { goals, has_more })
    }

    async fn toggle_reaction(&self, goal_id: Uuid, user_id: Uuid, kind: &str) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let key = (goal_id, user_id, kind.to_string());
        if inner.reactions.remove(&key) {
            Ok(false)
        } else {
            inner.reactions.insert(key);
            Ok(true)
        }
    }

    async fn add_journal(&self, goal_id: Uuid, _author: Uuid, _body: &str) -> Result<i64> {
        let mut inner = self.inner.write().await;
        inner.next_journal_id += 1;
        let id = inner.next_journal_id;
        inner.journals.push(Journal { id, goal_id });
        Ok(id)
    }

    async fn journal_count(&self, goal_id: Uuid) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner.journals.iter().filter(|j| j.goal_id == goal_id).count() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::{BlueprintNode, NodeType};

    async fn seed(store: &MemoryStore, public_count: usize) -> Uuid {
        let user = User::default_profile();
        let owner = user.id;
        store.upsert(&user).await.unwrap();
        for i in 0..public_count {
            let mut bp = Blueprint::new(&format!("목표 {}", i));
            bp.is_public = true;
            bp.category = Some("커리어".to_string());
            // Distinct timestamps so recency ordering is deterministic.
            bp.created_at = bp.created_at + chrono::Duration::seconds(i as i64);
            store.save(owner, &bp).await.unwrap();
        }
        owner
    }

    #[tokio::test]
    async fn test_pagination_has_more() {
        let store = MemoryStore::new();
        seed(&store, 5).await;

        let query = CommunityQuery {
            limit: 3,
            ..Default::default()
        };
        let page = store.list_public(&query).await.unwrap();
        assert_eq!(page.goals.len(), 3);
        assert!(page.has_more);

        let query = CommunityQuery {
            limit: 3,
            offset: 3,
            ..Default::default()
        };
        let page = store.list_public(&query).await.unwrap();
        assert_eq!(page.goals.len(), 2);
        assert!(!page.has_more);
    }

    // The documented off-by-one: when the total available is an exact
    // multiple of the limit, the last full page still reports has_more.
    #[tokio::test]
    async fn test_has_more_on_exact_multiple() {
        let store = MemoryStore::new();
        seed(&store, 6).await;

        let query = CommunityQuery {
            limit: 3,
            offset: 3,
            ..Default::default()
        };
        let page = store.list_public(&query).await.unwrap();
        assert_eq!(page.goals.len(), 3);
        assert!(page.has_more);

        let query = CommunityQuery {
            limit: 3,
            offset: 6,
            ..Default::default()
        };
        let page = store.list_public(&query).await.unwrap();
        assert!(page.goals.is_empty());
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn test_popular_sort_orders_by_reactions() {
        let store = MemoryStore::new();
        let owner = seed(&store, 3).await;

        let all = store
            .list_public(&CommunityQuery::default())
            .await
            .unwrap()
            .goals;
        let target = all[2].id;
        store.toggle_reaction(target, owner, "like").await.unwrap();
        store
            .toggle_reaction(target, Uuid::new_v4(), "like")
            .await
            .unwrap();

        let page = store
            .list_public(&CommunityQuery {
                sort: SortKey::Popular,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.goals[0].id, target);
        assert_eq!(page.goals[0].reaction_count, 2);
    }

    #[tokio::test]
    async fn test_category_filter() {
        let store = MemoryStore::new();
        let owner = seed(&store, 2).await;
        let mut other = Blueprint::new("건강 목표");
        other.is_public = true;
        other.category = Some("건강".to_string());
        store.save(owner, &other).await.unwrap();

        let page = store
            .list_public(&CommunityQuery {
                category: Some("건강".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.goals.len(), 1);
        assert_eq!(page.goals[0].title, "건강 목표");
    }

    #[tokio::test]
    async fn test_private_blueprints_hidden() {
        let store = MemoryStore::new();
        let owner = seed(&store, 1).await;
        let private = Blueprint::new("비공개");
        store.save(owner, &private).await.unwrap();

        let page = store.list_public(&CommunityQuery::default()).await.unwrap();
        assert_eq!(page.goals.len(), 1);
        assert_ne!(page.goals[0].title, "비공개");
    }

    #[tokio::test]
    async fn test_reaction_toggle() {
        let store = MemoryStore::new();
        let goal = Uuid::new_v4();
        let user = Uuid::new_v4();
        assert!(store.toggle_reaction(goal, user, "like").await.unwrap());
        assert!(!store.toggle_reaction(goal, user, "like").await.unwrap());
        assert!(store.toggle_reaction(goal, user, "like").await.unwrap());
    }

    #[tokio::test]
    async fn test_follow_updates_both_counters() {
        let store = MemoryStore::new();
        let mut a = User::default_profile();
        a.username = "a".to_string();
        let mut b = User::default_profile();
        b.username = "b".to_string();
        store.upsert(&a).await.unwrap();
        store.upsert(&b).await.unwrap();

        assert!(store.set_follow(a.id, b.id, true).await.unwrap());
        assert_eq!(UserRepo::get(&store, a.id).await.unwrap().unwrap().stats.following, 1);
        assert_eq!(UserRepo::get(&store, b.id).await.unwrap().unwrap().stats.followers, 1);

        // Repeated follow is a no-op on counters.
        store.set_follow(a.id, b.id, true).await.unwrap();
        assert_eq!(UserRepo::get(&store, a.id).await.unwrap().unwrap().stats.following, 1);

        assert!(!store.set_follow(a.id, b.id, false).await.unwrap());
        assert_eq!(UserRepo::get(&store, a.id).await.unwrap().unwrap().stats.following, 0);
        assert_eq!(UserRepo::get(&store, b.id).await.unwrap().unwrap().stats.followers, 0);

        // Unfollow again never underflows.
        store.set_follow(a.id, b.id, false).await.unwrap();
        assert_eq!(UserRepo::get(&store, b.id).await.unwrap().unwrap().stats.followers, 0);
    }

    #[tokio::test]
    async fn test_progress_sort() {
        let store = MemoryStore::new();
        let owner = seed(&store, 1).await;
        let mut busy = Blueprint::new("진행중");
        busy.is_public = true;
        let mut node = BlueprintNode::new(NodeType::Task, "t");
        node.set_progress(80);
        busy.nodes.push(node);
        store.save(owner, &busy).await.unwrap();

        let page = store
            .list_public(&CommunityQuery {
                sort: SortKey::Progress,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.goals[0].title, "진행중");
    }
}
