//! Goal graph data model.
//!
//! A blueprint is a user's goal graph: typed nodes (values down to tasks)
//! connected by directed edges. Validation enforces the referential
//! integrity the persistence layer relies on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: Uuid, node: Uuid },
    #[error("duplicate node id {0}")]
    DuplicateNode(Uuid),
    #[error("unknown {kind} token: {token}")]
    UnknownToken { kind: &'static str, token: String },
}

// ============================================================================
// Blueprint
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Nodes in user-defined order; order is preserved through storage.
    pub nodes: Vec<BlueprintNode>,
    pub edges: Vec<BlueprintEdge>,
    /// Gallery category (e.g. "커리어", "건강"). None = uncategorized.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Blueprint {
    pub fn new(title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            nodes: Vec::new(),
            edges: Vec::new(),
            category: None,
            is_public: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check referential integrity: node ids unique, every edge endpoint
    /// resolves to a node in this blueprint.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id) {
                return Err(DomainError::DuplicateNode(node.id));
            }
        }
        for edge in &self.edges {
            for endpoint in [edge.source, edge.target] {
                if !ids.contains(&endpoint) {
                    return Err(DomainError::DanglingEdge {
                        edge: edge.id,
                        node: endpoint,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn node(&self, id: Uuid) -> Option<&BlueprintNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Fraction of completed nodes, 0.0 for an empty graph.
    pub fn completion_rate(&self) -> f32 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        let done = self.nodes.iter().filter(|n| n.completed).count();
        done as f32 / self.nodes.len() as f32
    }
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintNode {
    pub id: Uuid,
    pub node_type: NodeType,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    /// 0-100. Clamped on construction and mutation.
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BlueprintNode {
    pub fn new(node_type: NodeType, title: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            node_type,
            title: title.to_string(),
            description: None,
            completed: false,
            progress: 0,
            due_date: None,
            priority: Priority::Medium,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set progress, clamped to 0-100. 100 marks the node completed.
    pub fn set_progress(&mut self, progress: u8) {
        self.progress = progress.min(100);
        if self.progress >= 100 {
            self.completed = true;
        }
        self.updated_at = Utc::now();
    }
}

/// Level in the goal hierarchy, top (value) to bottom (task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Value,
    LongGoal,
    ShortGoal,
    Plan,
    Task,
}

impl NodeType {
    pub const ALL: [NodeType; 5] = [
        NodeType::Value,
        NodeType::LongGoal,
        NodeType::ShortGoal,
        NodeType::Plan,
        NodeType::Task,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Value => "value",
            NodeType::LongGoal => "long_goal",
            NodeType::ShortGoal => "short_goal",
            NodeType::Plan => "plan",
            NodeType::Task => "task",
        }
    }

    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "value" => Ok(NodeType::Value),
            "long_goal" => Ok(NodeType::LongGoal),
            "short_goal" => Ok(NodeType::ShortGoal),
            "plan" => Ok(NodeType::Plan),
            "task" => Ok(NodeType::Task),
            _ => Err(DomainError::UnknownToken {
                kind: "node_type",
                token: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

// ============================================================================
// Edges
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueprintEdge {
    pub id: Uuid,
    pub source: Uuid,
    pub target: Uuid,
    pub relation: EdgeRelation,
}

impl BlueprintEdge {
    pub fn new(source: Uuid, target: Uuid, relation: EdgeRelation) -> Self {
        Self {
            id: Uuid::new_v4(),
            source,
            target,
            relation,
        }
    }
}

/// How the source node relates to the target node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeRelation {
    Dependency,
    ContributesTo,
    Enables,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_blueprint() -> (Blueprint, Uuid, Uuid) {
        let mut bp = Blueprint::new("테스트 청사진");
        let a = BlueprintNode::new(NodeType::Value, "성장");
        let b = BlueprintNode::new(NodeType::LongGoal, "개발자 되기");
        let (ida, idb) = (a.id, b.id);
        bp.nodes.push(a);
        bp.nodes.push(b);
        (bp, ida, idb)
    }

    #[test]
    fn test_validate_ok() {
        let (mut bp, a, b) = two_node_blueprint();
        bp.edges
            .push(BlueprintEdge::new(a, b, EdgeRelation::ContributesTo));
        assert!(bp.validate().is_ok());
    }

    #[test]
    fn test_validate_dangling_edge() {
        let (mut bp, a, _) = two_node_blueprint();
        let ghost = Uuid::new_v4();
        bp.edges
            .push(BlueprintEdge::new(a, ghost, EdgeRelation::Dependency));
        match bp.validate() {
            Err(DomainError::DanglingEdge { node, .. }) => assert_eq!(node, ghost),
            other => panic!("expected dangling edge error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_node() {
        let (mut bp, a, _) = two_node_blueprint();
        let mut dup = BlueprintNode::new(NodeType::Task, "중복");
        dup.id = a;
        bp.nodes.push(dup);
        assert!(matches!(
            bp.validate(),
            Err(DomainError::DuplicateNode(id)) if id == a
        ));
    }

    #[test]
    fn test_progress_clamped() {
        let mut node = BlueprintNode::new(NodeType::Task, "운동하기");
        node.set_progress(250);
        assert_eq!(node.progress, 100);
        assert!(node.completed);
    }

    #[test]
    fn test_progress_partial_not_completed() {
        let mut node = BlueprintNode::new(NodeType::Task, "책 읽기");
        node.set_progress(40);
        assert_eq!(node.progress, 40);
        assert!(!node.completed);
    }

    #[test]
    fn test_completion_rate() {
        let (mut bp, _, _) = two_node_blueprint();
        assert_eq!(bp.completion_rate(), 0.0);
        bp.nodes[0].completed = true;
        assert!((bp.completion_rate() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_node_type_roundtrip() {
        for ty in NodeType::ALL {
            assert_eq!(NodeType::parse_str(ty.as_str()).unwrap(), ty);
        }
        assert!(NodeType::parse_str("vibe").is_err());
    }

    #[test]
    fn test_blueprint_json_roundtrip() {
        let (mut bp, a, b) = two_node_blueprint();
        bp.edges
            .push(BlueprintEdge::new(a, b, EdgeRelation::Enables));
        let json = serde_json::to_string(&bp).unwrap();
        let back: Blueprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back.nodes.len(), 2);
        assert_eq!(back.edges.len(), 1);
        assert_eq!(back.edges[0].relation, EdgeRelation::Enables);
        assert_eq!(back.created_at, bp.created_at);
    }
}
