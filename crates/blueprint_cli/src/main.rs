use anyhow::Result;
use blueprint_ai::{LlmClient, MockClient, OpenAiClient};
use blueprint_core::AppConfig;
use blueprint_server::{ApiServer, AppState};
use blueprint_store::{ProfileStore, SqliteStore};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "blueprint.toml")]
    config: String,

    /// Path to the SQLite database (overrides config)
    #[arg(long)]
    db: Option<String>,

    /// Directory for the file-backed demo profile (overrides config)
    #[arg(long)]
    profile_dir: Option<String>,

    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Use the deterministic mock LLM instead of OpenAI (no API key needed)
    #[arg(long)]
    mock_llm: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load_or_default(&args.config);
    if let Some(db) = args.db {
        config.storage.db_path = db;
    }
    if let Some(dir) = args.profile_dir {
        config.storage.profile_dir = dir;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    info!("Opening database at {}...", config.storage.db_path);
    let store = Arc::new(SqliteStore::new(&config.storage.db_path).await?);

    info!("Using profile directory {}", config.storage.profile_dir);
    let profile = Arc::new(ProfileStore::new(&config.storage.profile_dir)?);

    let llm: Arc<dyn LlmClient> = if args.mock_llm {
        info!("Using mock LLM provider");
        Arc::new(MockClient::new(
            "목표를 조금 더 구체적으로 말씀해 주시겠어요?",
        ))
    } else {
        info!("Using OpenAI provider with model {}", config.llm.model);
        Arc::new(OpenAiClient::new(
            &config.llm.model,
            config.llm.base_url.as_deref(),
        )?)
    };

    let state = AppState {
        blueprints: store.clone(),
        users: store.clone(),
        community: store,
        llm,
        profile,
        admin_token: config.server.admin_token.clone(),
    };

    let server = ApiServer::new(state, &config.server.host, config.server.port);
    let handle = server.start();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
        _ = handle => {
            info!("Server task exited");
        }
    }

    Ok(())
}
