//! User profile, stats, and badges.
//!
//! In the demo path a single profile lives in a local file store; in the
//! persisted path it is a row in the `users` table. Both serialize the
//! same shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub stats: UserStats,
    #[serde(default)]
    pub badges: Vec<Badge>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub blueprints_count: u32,
    pub completed_goals: u32,
    pub followers: u32,
    pub following: u32,
}

/// Badges are append-only: once unlocked, never removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: String,
    pub unlocked_at: DateTime<Utc>,
}

impl User {
    /// Demo profile created on first run: one starter blueprint and the
    /// first-blueprint badge already unlocked.
    pub fn default_profile() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: "dreamer".to_string(),
            email: "dreamer@blueprint.local".to_string(),
            display_name: "꿈꾸는 사람".to_string(),
            bio: "나만의 청사진을 그려갑니다".to_string(),
            interests: vec!["자기계발".to_string(), "목표달성".to_string()],
            stats: UserStats {
                blueprints_count: 1,
                completed_goals: 0,
                followers: 0,
                following: 0,
            },
            badges: vec![Badge {
                id: "first-blueprint".to_string(),
                name: "첫 청사진".to_string(),
                description: "첫 번째 청사진을 만들었습니다".to_string(),
                icon: "🎨".to_string(),
                category: "creation".to_string(),
                unlocked_at: now,
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Add a badge. No-op if a badge with the same id is already unlocked.
    pub fn add_badge(&mut self, badge: Badge) -> bool {
        if self.badges.iter().any(|b| b.id == badge.id) {
            return false;
        }
        self.badges.push(badge);
        self.updated_at = Utc::now();
        true
    }
}
