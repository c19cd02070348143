use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load config from a TOML file, falling back to defaults for missing
    /// fields. After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with
    /// env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = std::env::var("SERVER_PORT") {
            if let Ok(n) = v.parse() {
                self.server.port = n;
            }
        }
        if let Ok(v) = std::env::var("ADMIN_TOKEN") {
            self.server.admin_token = Some(v);
        }
        if let Ok(v) = std::env::var("LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("OPENAI_BASE_URL") {
            self.llm.base_url = Some(v);
        }
        if let Ok(v) = std::env::var("LLM_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                self.llm.max_tokens = n;
            }
        }
        if let Ok(v) = std::env::var("LLM_TEMPERATURE") {
            if let Ok(n) = v.parse() {
                self.llm.temperature = n;
            }
        }
        if let Ok(v) = std::env::var("BLUEPRINT_DB") {
            self.storage.db_path = v;
        }
        if let Ok(v) = std::env::var("BLUEPRINT_PROFILE_DIR") {
            self.storage.profile_dir = v;
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token required by /api/admin routes. None = open (demo mode).
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            admin_token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Directory for the file-backed demo profile (the local-storage
    /// analog). Migration imports from here into the database.
    pub profile_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: "blueprint.db".to_string(),
            profile_dir: "profile".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.llm.model, "gpt-4o-mini");
        assert!(cfg.server.admin_token.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [llm]
            model = "gpt-4o"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.llm.model, "gpt-4o");
        assert_eq!(cfg.storage.db_path, "blueprint.db");
    }
}
