//! Integration tests for the SQLite backend.
//!
//! Each test gets its own database file; the pool keeps multiple
//! connections, so `:memory:` would hand each connection a different db.

use blueprint_core::{Blueprint, BlueprintNode, NodeType, User};
use blueprint_store::{
    BlueprintRepo, CommunityQuery, CommunityRepo, SortKey, SqliteStore, UserRepo,
};
use tempfile::TempDir;
use uuid::Uuid;

async fn open_store() -> (TempDir, SqliteStore) {
    let dir = TempDir::new().expect("tempdir");
    let store = SqliteStore::new(dir.path().join("test.db"))
        .await
        .expect("open store");
    (dir, store)
}

async fn seed_user(store: &SqliteStore, username: &str) -> User {
    let mut user = User::default_profile();
    user.username = username.to_string();
    store.upsert(&user).await.expect("upsert user");
    user
}

#[tokio::test]
async fn test_user_upsert_and_lookup() {
    let (_dir, store) = open_store().await;
    let user = seed_user(&store, "dreamer").await;

    let by_id = UserRepo::get(&store, user.id).await.unwrap().unwrap();
    assert_eq!(by_id.username, "dreamer");
    assert_eq!(by_id.badges.len(), 1);
    assert_eq!(by_id.stats.blueprints_count, 1);

    let by_name = store.get_by_username("dreamer").await.unwrap().unwrap();
    assert_eq!(by_name.id, user.id);

    // Upsert replaces fields in place.
    let mut updated = user.clone();
    updated.bio = "새 소개".to_string();
    store.upsert(&updated).await.unwrap();
    let again = UserRepo::get(&store, user.id).await.unwrap().unwrap();
    assert_eq!(again.bio, "새 소개");

    assert!(UserRepo::get(&store, Uuid::new_v4())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_blueprint_save_load_delete() {
    let (_dir, store) = open_store().await;
    let user = seed_user(&store, "writer").await;

    let mut bp = Blueprint::new("저장 테스트");
    let mut node = BlueprintNode::new(NodeType::Task, "할 일");
    node.set_progress(60);
    bp.nodes.push(node);
    store.save(user.id, &bp).await.unwrap();

    let loaded = BlueprintRepo::get(&store, bp.id).await.unwrap().unwrap();
    assert_eq!(loaded.title, "저장 테스트");
    assert_eq!(loaded.nodes.len(), 1);
    assert_eq!(loaded.nodes[0].progress, 60);
    assert_eq!(loaded.created_at.timestamp(), bp.created_at.timestamp());

    // Replace on save with same id.
    let mut edited = loaded.clone();
    edited.title = "수정됨".to_string();
    store.save(user.id, &edited).await.unwrap();
    let listed = store.list_by_owner(user.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "수정됨");

    assert!(BlueprintRepo::delete(&store, bp.id).await.unwrap());
    assert!(!BlueprintRepo::delete(&store, bp.id).await.unwrap());
    assert!(BlueprintRepo::get(&store, bp.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_community_pagination_and_has_more() {
    let (_dir, store) = open_store().await;
    let user = seed_user(&store, "public").await;

    for i in 0..6 {
        let mut bp = Blueprint::new(&format!("공개 {}", i));
        bp.is_public = true;
        bp.created_at = bp.created_at + chrono::Duration::seconds(i);
        bp.updated_at = bp.created_at;
        store.save(user.id, &bp).await.unwrap();
    }

    let page = store
        .list_public(&CommunityQuery {
            limit: 4,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.goals.len(), 4);
    assert!(page.has_more);
    // Recent sort: newest first.
    assert_eq!(page.goals[0].title, "공개 5");

    let rest = store
        .list_public(&CommunityQuery {
            limit: 4,
            offset: 4,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(rest.goals.len(), 2);
    assert!(!rest.has_more);

    // Exact multiple: 6 rows, limit 3, second page is full so has_more
    // stays true even though page three is empty.
    let exact = store
        .list_public(&CommunityQuery {
            limit: 3,
            offset: 3,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(exact.goals.len(), 3);
    assert!(exact.has_more);
}

#[tokio::test]
async fn test_community_popular_sort_and_counts() {
    let (_dir, store) = open_store().await;
    let user = seed_user(&store, "popular").await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let mut bp = Blueprint::new(&format!("목표 {}", i));
        bp.is_public = true;
        store.save(user.id, &bp).await.unwrap();
        ids.push(bp.id);
    }

    store.toggle_reaction(ids[1], user.id, "like").await.unwrap();
    store
        .toggle_reaction(ids[1], Uuid::new_v4(), "cheer")
        .await
        .unwrap();
    store.add_journal(ids[1], user.id, "첫 기록").await.unwrap();

    let page = store
        .list_public(&CommunityQuery {
            sort: SortKey::Popular,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.goals[0].id, ids[1]);
    assert_eq!(page.goals[0].reaction_count, 2);
    assert_eq!(page.goals[0].journal_count, 1);
    assert_eq!(page.goals[0].author.username, "popular");

    // Toggling off drops the count.
    store.toggle_reaction(ids[1], user.id, "like").await.unwrap();
    let page = store
        .list_public(&CommunityQuery {
            sort: SortKey::Popular,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.goals[0].reaction_count, 1);
}

#[tokio::test]
async fn test_community_category_filter() {
    let (_dir, store) = open_store().await;
    let user = seed_user(&store, "tagged").await;

    let mut career = Blueprint::new("커리어");
    career.is_public = true;
    career.category = Some("커리어".to_string());
    store.save(user.id, &career).await.unwrap();

    let mut health = Blueprint::new("건강");
    health.is_public = true;
    health.category = Some("건강".to_string());
    store.save(user.id, &health).await.unwrap();

    let page = store
        .list_public(&CommunityQuery {
            category: Some("건강".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.goals.len(), 1);
    assert_eq!(page.goals[0].title, "건강");
}

#[tokio::test]
async fn test_follow_adjusts_stats() {
    let (_dir, store) = open_store().await;
    let a = seed_user(&store, "alpha").await;
    let b = seed_user(&store, "beta").await;

    assert!(store.set_follow(a.id, b.id, true).await.unwrap());
    assert_eq!(
        UserRepo::get(&store, a.id).await.unwrap().unwrap().stats.following,
        1
    );
    assert_eq!(
        UserRepo::get(&store, b.id).await.unwrap().unwrap().stats.followers,
        1
    );

    // Idempotent repeat.
    store.set_follow(a.id, b.id, true).await.unwrap();
    assert_eq!(
        UserRepo::get(&store, a.id).await.unwrap().unwrap().stats.following,
        1
    );

    assert!(!store.set_follow(a.id, b.id, false).await.unwrap());
    assert_eq!(
        UserRepo::get(&store, b.id).await.unwrap().unwrap().stats.followers,
        0
    );
}
