use crate::repo::{
    BlueprintRepo, CommunityAuthor, CommunityGoal, CommunityPage, CommunityQuery, CommunityRepo,
    SortKey, UserRepo,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use blueprint_core::{Badge, Blueprint, User, UserStats};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, Row, Sqlite};
use std::path::Path;
use uuid::Uuid;

#[derive(Clone)]
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    pub async fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let db_url = format!("sqlite://{}?mode=rwc", db_path.as_ref().display());
        let pool = SqlitePoolOptions::new()
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA foreign_keys = ON").execute(conn).await?;
                    Ok(())
                })
            })
            .connect(&db_url)
            .await
            .context("Failed to connect to SQLite database")?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                display_name TEXT NOT NULL,
                bio TEXT NOT NULL DEFAULT '',
                interests_json TEXT NOT NULL DEFAULT '[]',
                stats_json TEXT NOT NULL DEFAULT '{}',
                badges_json TEXT NOT NULL DEFAULT '[]',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create users table")?;

        // Nodes and edges are stored as JSON blobs: they are always read
        // and written as a whole with their blueprint. node_count and
        // avg_progress are derived columns maintained on save so the
        // gallery can sort without parsing JSON.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS blueprints (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                category TEXT,
                is_public INTEGER NOT NULL DEFAULT 0,
                nodes_json TEXT NOT NULL,
                edges_json TEXT NOT NULL,
                node_count INTEGER NOT NULL DEFAULT 0,
                avg_progress REAL NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY(owner_id) REFERENCES users(id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create blueprints table")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_blueprints_public ON blueprints(is_public, category)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create blueprints public index")?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_blueprints_owner ON blueprints(owner_id)",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create blueprints owner index")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS journals (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                goal_id TEXT NOT NULL,
                author_id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY(goal_id) REFERENCES blueprints(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create journals table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_journals_goal ON journals(goal_id)")
            .execute(&self.pool)
            .await
            .context("Failed to create journals index")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS goal_reactions (
                goal_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (goal_id, user_id, kind),
                FOREIGN KEY(goal_id) REFERENCES blueprints(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create goal_reactions table")?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_reactions_goal ON goal_reactions(goal_id)")
            .execute(&self.pool)
            .await
            .context("Failed to create reactions index")?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS follows (
                follower_id TEXT NOT NULL,
                followee_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (follower_id, followee_id)
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create follows table")?;

        Ok(())
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn ts_to_datetime(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .with_context(|| format!("Invalid timestamp in database: {}", secs))
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let id: String = row.get("id");
    let interests_json: String = row.get("interests_json");
    let stats_json: String = row.get("stats_json");
    let badges_json: String = row.get("badges_json");

    Ok(User {
        id: Uuid::parse_str(&id).context("Invalid user id in database")?,
        username: row.get("username"),
        email: row.get("email"),
        display_name: row.get("display_name"),
        bio: row.get("bio"),
        interests: serde_json::from_str(&interests_json).context("Failed to parse interests")?,
        stats: serde_json::from_str::<UserStats>(&stats_json).unwrap_or_default(),
        badges: serde_json::from_str::<Vec<Badge>>(&badges_json)
            .context("Failed to parse badges")?,
        created_at: ts_to_datetime(row.get("created_at"))?,
        updated_at: ts_to_datetime(row.get("updated_at"))?,
    })
}

fn row_to_blueprint(row: &sqlx::sqlite::SqliteRow) -> Result<Blueprint> {
    let id: String = row.get("id");
    let nodes_json: String = row.get("nodes_json");
    let edges_json: String = row.get("edges_json");
    let is_public: i64 = row.get("is_public");

    Ok(Blueprint {
        id: Uuid::parse_str(&id).context("Invalid blueprint id in database")?,
        title: row.get("title"),
        description: row.get("description"),
        nodes: serde_json::from_str(&nodes_json).context("Failed to parse blueprint nodes")?,
        edges: serde_json::from_str(&edges_json).context("Failed to parse blueprint edges")?,
        category: row.get("category"),
        is_public: is_public != 0,
        created_at: ts_to_datetime(row.get("created_at"))?,
        updated_at: ts_to_datetime(row.get("updated_at"))?,
    })
}

// ============================================================================
// BlueprintRepo
// ============================================================================

#[async_trait]
impl BlueprintRepo for SqliteStore {
    async fn save(&self, owner: Uuid, blueprint: &Blueprint) -> Result<()> {
        let nodes_json =
            serde_json::to_string(&blueprint.nodes).context("Failed to serialize nodes")?;
        let edges_json =
            serde_json::to_string(&blueprint.edges).context("Failed to serialize edges")?;
        let node_count = blueprint.nodes.len() as i64;
        let avg_progress = if blueprint.nodes.is_empty() {
            0.0
        } else {
            blueprint.nodes.iter().map(|n| n.progress as f64).sum::<f64>()
                / blueprint.nodes.len() as f64
        };

        sqlx::query(
            r#"
            INSERT INTO blueprints
                (id, owner_id, title, description, category, is_public,
                 nodes_json, edges_json, node_count, avg_progress, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                category = excluded.category,
                is_public = excluded.is_public,
                nodes_json = excluded.nodes_json,
                edges_json = excluded.edges_json,
                node_count = excluded.node_count,
                avg_progress = excluded.avg_progress,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(blueprint.id.to_string())
        .bind(owner.to_string())
        .bind(&blueprint.title)
        .bind(&blueprint.description)
        .bind(&blueprint.category)
        .bind(blueprint.is_public as i64)
        .bind(&nodes_json)
        .bind(&edges_json)
        .bind(node_count)
        .bind(avg_progress)
        .bind(blueprint.created_at.timestamp())
        .bind(blueprint.updated_at.timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to save blueprint")?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Blueprint>> {
        let row = sqlx::query("SELECT * FROM blueprints WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query blueprint")?;

        row.as_ref().map(row_to_blueprint).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blueprints WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .context("Failed to delete blueprint")?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Blueprint>> {
        let rows =
            sqlx::query("SELECT * FROM blueprints WHERE owner_id = ? ORDER BY updated_at DESC")
                .bind(owner.to_string())
                .fetch_all(&self.pool)
                .await
                .context("Failed to list blueprints")?;

        rows.iter().map(row_to_blueprint).collect()
    }
}

// ============================================================================
// UserRepo
// ============================================================================

#[async_trait]
impl UserRepo for SqliteStore {
    async fn upsert(&self, user: &User) -> Result<()> {
        let interests_json =
            serde_json::to_string(&user.interests).context("Failed to serialize interests")?;
        let stats_json =
            serde_json::to_string(&user.stats).context("Failed to serialize stats")?;
        let badges_json =
            serde_json::to_string(&user.badges).context("Failed to serialize badges")?;

        sqlx::query(
            r#"
            INSERT INTO users
                (id, username, email, display_name, bio,
                 interests_json, stats_json, badges_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                username = excluded.username,
                email = excluded.email,
                display_name = excluded.display_name,
                bio = excluded.bio,
                interests_json = excluded.interests_json,
                stats_json = excluded.stats_json,
                badges_json = excluded.badges_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.display_name)
        .bind(&user.bio)
        .bind(&interests_json)
        .bind(&stats_json)
        .bind(&badges_json)
        .bind(user.created_at.timestamp())
        .bind(user.updated_at.timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to upsert user")?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query user")?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to query user by username")?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn set_follow(&self, follower: Uuid, followee: Uuid, following: bool) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let changed = if following {
            sqlx::query(
                "INSERT OR IGNORE INTO follows (follower_id, followee_id, created_at) VALUES (?, ?, ?)",
            )
            .bind(follower.to_string())
            .bind(followee.to_string())
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await
            .context("Failed to insert follow")?
            .rows_affected()
                > 0
        } else {
            sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followee_id = ?")
                .bind(follower.to_string())
                .bind(followee.to_string())
                .execute(&mut *tx)
                .await
                .context("Failed to delete follow")?
                .rows_affected()
                > 0
        };

        // Counters live inside stats_json; adjust both sides only when the
        // edge actually changed so repeated toggles stay consistent.
        if changed {
            adjust_stats(&mut tx, follower, |stats| {
                if following {
                    stats.following += 1;
                } else {
                    stats.following = stats.following.saturating_sub(1);
                }
            })
            .await?;
            adjust_stats(&mut tx, followee, |stats| {
                if following {
                    stats.followers += 1;
                } else {
                    stats.followers = stats.followers.saturating_sub(1);
                }
            })
            .await?;
        }

        tx.commit().await?;
        Ok(following)
    }
}

async fn adjust_stats<F>(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    user_id: Uuid,
    apply: F,
) -> Result<()>
where
    F: FnOnce(&mut UserStats),
{
    let row = sqlx::query("SELECT stats_json FROM users WHERE id = ?")
        .bind(user_id.to_string())
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to read user stats")?;

    let Some(row) = row else {
        // Unknown user: keep the follow edge, skip the counter.
        tracing::debug!("set_follow touched unknown user {}", user_id);
        return Ok(());
    };

    let stats_json: String = row.get("stats_json");
    let mut stats: UserStats = serde_json::from_str(&stats_json).unwrap_or_default();
    apply(&mut stats);

    sqlx::query("UPDATE users SET stats_json = ?, updated_at = ? WHERE id = ?")
        .bind(serde_json::to_string(&stats).context("Failed to serialize stats")?)
        .bind(Utc::now().timestamp())
        .bind(user_id.to_string())
        .execute(&mut **tx)
        .await
        .context("Failed to write user stats")?;

    Ok(())
}

// ============================================================================
// CommunityRepo
// ============================================================================

#[async_trait]
impl CommunityRepo for SqliteStore {
    async fn list_public(&self, query: &CommunityQuery) -> Result<CommunityPage> {
        let limit = query.clamped_limit();

        let order = match query.sort {
            SortKey::Recent => "b.created_at DESC",
            SortKey::Popular => "reaction_count DESC, b.created_at DESC",
            SortKey::Progress => "b.avg_progress DESC, b.created_at DESC",
        };

        let mut sql = String::from(
            r#"
            SELECT b.id, b.title, b.description, b.category, b.node_count,
                   b.avg_progress, b.created_at,
                   u.id AS author_id, u.username, u.display_name,
                   (SELECT COUNT(*) FROM journals j WHERE j.goal_id = b.id) AS journal_count,
                   (SELECT COUNT(*) FROM goal_reactions r WHERE r.goal_id = b.id) AS reaction_count
            FROM blueprints b
            JOIN users u ON u.id = b.owner_id
            WHERE b.is_public = 1
            "#,
        );
        if query.category.is_some() {
            sql.push_str(" AND b.category = ?");
        }
        sql.push_str(&format!(" ORDER BY {} LIMIT ? OFFSET ?", order));

        let mut q = sqlx::query(&sql);
        if let Some(category) = &query.category {
            q = q.bind(category);
        }
        q = q.bind(limit as i64).bind(query.offset as i64);

        let rows = q
            .fetch_all(&self.pool)
            .await
            .context("Failed to query community goals")?;

        let mut goals = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: String = row.get("id");
            let author_id: String = row.get("author_id");
            let avg_progress: f64 = row.get("avg_progress");
            goals.push(CommunityGoal {
                id: Uuid::parse_str(&id).context("Invalid blueprint id in database")?,
                title: row.get("title"),
                description: row.get("description"),
                category: row.get("category"),
                author: CommunityAuthor {
                    id: Uuid::parse_str(&author_id).context("Invalid author id in database")?,
                    username: row.get("username"),
                    display_name: row.get("display_name"),
                },
                node_count: row.get("node_count"),
                average_progress: avg_progress as f32,
                journal_count: row.get("journal_count"),
                reaction_count: row.get("reaction_count"),
                created_at: ts_to_datetime(row.get("created_at"))?,
            });
        }

        let has_more = goals.len() == limit;
        Ok(CommunityPage { goals, has_more })
    }

    async fn toggle_reaction(&self, goal_id: Uuid, user_id: Uuid, kind: &str) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query(
            "DELETE FROM goal_reactions WHERE goal_id = ? AND user_id = ? AND kind = ?",
        )
        .bind(goal_id.to_string())
        .bind(user_id.to_string())
        .bind(kind)
        .execute(&mut *tx)
        .await
        .context("Failed to remove reaction")?
        .rows_affected()
            > 0;

        let reacted = if removed {
            false
        } else {
            sqlx::query(
                "INSERT INTO goal_reactions (goal_id, user_id, kind, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(goal_id.to_string())
            .bind(user_id.to_string())
            .bind(kind)
            .bind(Utc::now().timestamp())
            .execute(&mut *tx)
            .await
            .context("Failed to insert reaction")?;
            true
        };

        tx.commit().await?;
        Ok(reacted)
    }

    async fn add_journal(&self, goal_id: Uuid, author: Uuid, body: &str) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO journals (goal_id, author_id, body, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(goal_id.to_string())
        .bind(author.to_string())
        .bind(body)
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await
        .context("Failed to insert journal")?;

        Ok(result.last_insert_rowid())
    }

    async fn journal_count(&self, goal_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS c FROM journals WHERE goal_id = ?")
            .bind(goal_id.to_string())
            .fetch_one(&self.pool)
            .await
            .context("Failed to count journals")?;
        Ok(row.get("c"))
    }
}
