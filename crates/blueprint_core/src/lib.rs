pub mod analysis;
pub mod blueprint;
pub mod config;
pub mod user;

pub use analysis::{analyze, BasicAnalysis, BlueprintSummary, TagCount};
pub use blueprint::{
    Blueprint, BlueprintEdge, BlueprintNode, DomainError, EdgeRelation, NodeType, Priority,
};
pub use config::{AppConfig, LlmConfig, ServerConfig, StorageConfig};
pub use user::{Badge, User, UserStats};
