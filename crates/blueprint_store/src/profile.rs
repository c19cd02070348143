//! File-backed demo profile.
//!
//! The demo path keeps one user profile and their blueprints as JSON files
//! in a directory (`user-profile.json`, `blueprint-<id>.json`). Every
//! mutation rewrites the whole serialized object; there is no partial
//! update and no cross-process locking — last writer wins.

use anyhow::{Context, Result};
use blueprint_core::{Blueprint, User};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const PROFILE_FILE: &str = "user-profile.json";
pub const BLUEPRINT_PREFIX: &str = "blueprint-";

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create profile dir: {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn profile_path(&self) -> PathBuf {
        self.dir.join(PROFILE_FILE)
    }

    fn blueprint_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{}{}.json", BLUEPRINT_PREFIX, id))
    }

    /// Load the stored profile, creating and persisting the default demo
    /// user on first call.
    pub fn load_or_create_user(&self) -> Result<User> {
        let path = self.profile_path();
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let user: User =
                serde_json::from_str(&content).context("Failed to parse stored profile")?;
            return Ok(user);
        }

        let user = User::default_profile();
        self.save_user(&user)?;
        tracing::info!("Created default profile for {}", user.username);
        Ok(user)
    }

    /// Rewrite the full serialized profile.
    pub fn save_user(&self, user: &User) -> Result<()> {
        let json = serde_json::to_string_pretty(user).context("Failed to serialize profile")?;
        fs::write(self.profile_path(), json).context("Failed to write profile")?;
        Ok(())
    }

    pub fn save_blueprint(&self, blueprint: &Blueprint) -> Result<()> {
        let json =
            serde_json::to_string_pretty(blueprint).context("Failed to serialize blueprint")?;
        fs::write(self.blueprint_path(blueprint.id), json)
            .context("Failed to write blueprint")?;
        Ok(())
    }

    pub fn load_blueprint(&self, id: Uuid) -> Result<Option<Blueprint>> {
        let path = self.blueprint_path(id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let blueprint =
            serde_json::from_str(&content).context("Failed to parse stored blueprint")?;
        Ok(Some(blueprint))
    }

    /// All `blueprint-*.json` records in the directory. Unparseable files
    /// are skipped with a warning rather than failing the whole load.
    pub fn load_blueprints(&self) -> Result<Vec<Blueprint>> {
        let mut blueprints = Vec::new();
        for entry in fs::read_dir(&self.dir).context("Failed to read profile dir")? {
            let entry = entry?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(BLUEPRINT_PREFIX) || !name.ends_with(".json") {
                continue;
            }
            let content = fs::read_to_string(entry.path())
                .with_context(|| format!("Failed to read {}", entry.path().display()))?;
            match serde_json::from_str::<Blueprint>(&content) {
                Ok(bp) => blueprints.push(bp),
                Err(e) => {
                    tracing::warn!("Skipping unparseable blueprint file {}: {}", name, e);
                }
            }
        }
        blueprints.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(blueprints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::{BlueprintEdge, BlueprintNode, EdgeRelation, NodeType};
    use tempfile::tempdir;

    #[test]
    fn test_first_load_creates_default_user() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        let user = store.load_or_create_user().unwrap();
        assert_eq!(user.stats.blueprints_count, 1);
        assert_eq!(user.badges.len(), 1);
        assert_eq!(user.badges[0].id, "first-blueprint");
        assert!(dir.path().join(PROFILE_FILE).exists());
    }

    #[test]
    fn test_second_load_returns_persisted_user() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        let mut user = store.load_or_create_user().unwrap();
        user.bio = "수정된 소개".to_string();
        store.save_user(&user).unwrap();

        let again = store.load_or_create_user().unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(again.bio, "수정된 소개");
        assert_eq!(again.created_at, user.created_at);
    }

    #[test]
    fn test_blueprint_roundtrip_revives_dates() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        let mut bp = Blueprint::new("라운드트립");
        let mut node = BlueprintNode::new(NodeType::Plan, "계획");
        node.due_date = Some(chrono::Utc::now());
        let target = BlueprintNode::new(NodeType::Task, "과제");
        bp.edges.push(BlueprintEdge::new(
            node.id,
            target.id,
            EdgeRelation::Enables,
        ));
        bp.nodes.push(node);
        bp.nodes.push(target);

        store.save_blueprint(&bp).unwrap();
        let loaded = store.load_blueprint(bp.id).unwrap().unwrap();

        assert_eq!(loaded.nodes.len(), bp.nodes.len());
        assert_eq!(loaded.edges.len(), bp.edges.len());
        assert_eq!(loaded.nodes[0].id, bp.nodes[0].id);
        assert_eq!(loaded.nodes[0].due_date, bp.nodes[0].due_date);
        assert_eq!(loaded.created_at, bp.created_at);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_load_blueprints_skips_garbage() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();

        let bp = Blueprint::new("정상");
        store.save_blueprint(&bp).unwrap();
        std::fs::write(dir.path().join("blueprint-broken.json"), "not json").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loaded = store.load_blueprints().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, bp.id);
    }

    #[test]
    fn test_missing_blueprint_is_none() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path()).unwrap();
        assert!(store.load_blueprint(Uuid::new_v4()).unwrap().is_none());
    }
}
