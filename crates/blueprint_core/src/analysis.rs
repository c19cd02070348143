//! Local blueprint analysis.
//!
//! Synchronous, pure summary over a set of blueprints. This always runs;
//! the AI narrative layered on top of it is optional and may fail without
//! affecting this result.

use crate::blueprint::{Blueprint, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicAnalysis {
    pub blueprint_count: usize,
    pub total_nodes: usize,
    pub total_edges: usize,
    /// Node count per hierarchy level, keyed by `NodeType::as_str`.
    pub nodes_by_type: HashMap<String, usize>,
    pub completed_nodes: usize,
    /// Completed nodes / total nodes, 0.0 when empty.
    pub completion_rate: f32,
    /// Mean of node progress values, 0.0 when empty.
    pub average_progress: f32,
    /// Most frequent tags, descending, capped at 10.
    pub top_tags: Vec<TagCount>,
    pub blueprints: Vec<BlueprintSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintSummary {
    pub id: Uuid,
    pub title: String,
    pub node_count: usize,
    pub completion_rate: f32,
    /// Hierarchy levels present, top-down. A graph with values but no
    /// tasks reads as aspiration without execution; the narrative layer
    /// keys off this.
    pub levels_present: Vec<String>,
}

pub fn analyze(blueprints: &[Blueprint]) -> BasicAnalysis {
    let mut nodes_by_type: HashMap<String, usize> = HashMap::new();
    let mut tag_counts: HashMap<String, usize> = HashMap::new();
    let mut total_nodes = 0usize;
    let mut total_edges = 0usize;
    let mut completed_nodes = 0usize;
    let mut progress_sum = 0u64;

    let mut summaries = Vec::with_capacity(blueprints.len());

    for bp in blueprints {
        total_nodes += bp.nodes.len();
        total_edges += bp.edges.len();

        let mut levels: Vec<&'static str> = Vec::new();
        for ty in NodeType::ALL {
            if bp.nodes.iter().any(|n| n.node_type == ty) {
                levels.push(ty.as_str());
            }
        }

        for node in &bp.nodes {
            *nodes_by_type
                .entry(node.node_type.as_str().to_string())
                .or_insert(0) += 1;
            if node.completed {
                completed_nodes += 1;
            }
            progress_sum += node.progress as u64;
            for tag in &node.tags {
                *tag_counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        summaries.push(BlueprintSummary {
            id: bp.id,
            title: bp.title.clone(),
            node_count: bp.nodes.len(),
            completion_rate: bp.completion_rate(),
            levels_present: levels.iter().map(|s| s.to_string()).collect(),
        });
    }

    let mut top_tags: Vec<TagCount> = tag_counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    top_tags.sort_by(|a, b| b.count.cmp(&a.count).then(a.tag.cmp(&b.tag)));
    top_tags.truncate(10);

    let completion_rate = if total_nodes == 0 {
        0.0
    } else {
        completed_nodes as f32 / total_nodes as f32
    };
    let average_progress = if total_nodes == 0 {
        0.0
    } else {
        progress_sum as f32 / total_nodes as f32
    };

    BasicAnalysis {
        blueprint_count: blueprints.len(),
        total_nodes,
        total_edges,
        nodes_by_type,
        completed_nodes,
        completion_rate,
        average_progress,
        top_tags,
        blueprints: summaries,
    }
}
