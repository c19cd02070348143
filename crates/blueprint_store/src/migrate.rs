//! One-shot import of file-backed demo data into a repository backend.
//!
//! Idempotent: records whose id already exists in the target store are
//! skipped, so re-running the migration is a no-op.

use crate::profile::ProfileStore;
use crate::repo::{BlueprintRepo, UserRepo};
use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub users_imported: usize,
    pub users_skipped: usize,
    pub blueprints_imported: usize,
    pub blueprints_skipped: usize,
}

impl MigrationReport {
    pub fn message(&self) -> String {
        format!(
            "사용자 {}명 이전 ({}명 건너뜀), 청사진 {}개 이전 ({}개 건너뜀)",
            self.users_imported,
            self.users_skipped,
            self.blueprints_imported,
            self.blueprints_skipped
        )
    }
}

pub async fn migrate_profile_data(
    profile: &ProfileStore,
    users: &dyn UserRepo,
    blueprints: &dyn BlueprintRepo,
) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    let user = profile.load_or_create_user()?;
    if users.get(user.id).await?.is_some() {
        report.users_skipped += 1;
    } else {
        users.upsert(&user).await?;
        report.users_imported += 1;
    }

    for blueprint in profile.load_blueprints()? {
        if blueprints.get(blueprint.id).await?.is_some() {
            report.blueprints_skipped += 1;
            continue;
        }
        blueprints.save(user.id, &blueprint).await?;
        report.blueprints_imported += 1;
    }

    tracing::info!("Migration finished: {}", report.message());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use blueprint_core::Blueprint;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_migration_imports_then_skips() {
        let dir = tempdir().unwrap();
        let profile = ProfileStore::new(dir.path()).unwrap();
        profile.save_blueprint(&Blueprint::new("하나")).unwrap();
        profile.save_blueprint(&Blueprint::new("둘")).unwrap();

        let store = MemoryStore::new();

        let first = migrate_profile_data(&profile, &store, &store).await.unwrap();
        assert_eq!(first.users_imported, 1);
        assert_eq!(first.blueprints_imported, 2);
        assert_eq!(first.blueprints_skipped, 0);

        // Second run imports nothing.
        let second = migrate_profile_data(&profile, &store, &store).await.unwrap();
        assert_eq!(second.users_imported, 0);
        assert_eq!(second.users_skipped, 1);
        assert_eq!(second.blueprints_imported, 0);
        assert_eq!(second.blueprints_skipped, 2);
    }

    #[tokio::test]
    async fn test_migration_picks_up_new_records() {
        let dir = tempdir().unwrap();
        let profile = ProfileStore::new(dir.path()).unwrap();
        let store = MemoryStore::new();

        migrate_profile_data(&profile, &store, &store).await.unwrap();

        profile.save_blueprint(&Blueprint::new("늦게 추가됨")).unwrap();
        let report = migrate_profile_data(&profile, &store, &store).await.unwrap();
        assert_eq!(report.blueprints_imported, 1);
        assert_eq!(report.users_skipped, 1);
    }
}
