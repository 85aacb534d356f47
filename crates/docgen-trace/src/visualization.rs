//! Renderable graph document for the matrix
//!
//! Paper elements in the left column, code elements in the right column,
//! one edge per relationship. The rendering collaborator decides styling.

use crate::matrix::TraceabilityMatrix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const COLUMN_SPACING: f64 = 400.0;
const ROW_SPACING: f64 = 80.0;

/// Node class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NodeClass {
    Paper,
    Code,
}

/// Layout position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// `paper:<id>` or `code:<id>`
    pub id: String,
    pub label: String,
    pub class: NodeClass,
    /// Concept type or code element type
    pub kind: String,
    /// Source file for code nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
    pub confidence: f64,
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub paper_nodes: usize,
    pub code_nodes: usize,
    pub edges: usize,
    /// Paper elements with at least one edge
    pub traced_paper_nodes: usize,
    /// Mean edge confidence (0 without edges)
    pub mean_confidence: f64,
}

/// Graph document consumed by the rendering collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub stats: GraphStats,
}

fn paper_node_id(id: &str) -> String {
    format!("paper:{id}")
}

fn code_node_id(id: &str) -> String {
    format!("code:{id}")
}

#[allow(clippy::cast_precision_loss)]
fn position(column: usize, row: usize) -> Position {
    Position {
        x: column as f64 * COLUMN_SPACING,
        y: row as f64 * ROW_SPACING,
    }
}

/// Build the graph document for a matrix
#[must_use]
pub fn generate_visualization(matrix: &TraceabilityMatrix) -> TraceGraph {
    let mut nodes = Vec::with_capacity(matrix.paper_elements.len() + matrix.code_elements.len());
    for (row, element) in matrix.paper_elements.iter().enumerate() {
        nodes.push(GraphNode {
            id: paper_node_id(&element.id),
            label: element.name.clone(),
            class: NodeClass::Paper,
            kind: element.element_type.to_string(),
            file_path: None,
            position: position(0, row),
        });
    }
    for (row, element) in matrix.code_elements.iter().enumerate() {
        nodes.push(GraphNode {
            id: code_node_id(&element.id),
            label: element.name.clone(),
            class: NodeClass::Code,
            kind: element.element_type.to_string(),
            file_path: Some(element.file_path.clone()),
            position: position(1, row),
        });
    }

    let edges: Vec<GraphEdge> = matrix
        .relationships
        .iter()
        .enumerate()
        .map(|(i, rel)| GraphEdge {
            id: format!("edge-{}", i + 1),
            source: paper_node_id(&rel.paper_element_id),
            target: code_node_id(&rel.code_element_id),
            edge_type: rel.trace_type.to_string(),
            confidence: rel.confidence,
            label: format!("{} ({:.2})", rel.trace_type, rel.confidence),
        })
        .collect();

    let traced: HashSet<&str> = matrix
        .relationships
        .iter()
        .map(|r| r.paper_element_id.as_str())
        .collect();
    #[allow(clippy::cast_precision_loss)]
    let mean_confidence = if edges.is_empty() {
        0.0
    } else {
        edges.iter().map(|e| e.confidence).sum::<f64>() / edges.len() as f64
    };

    let stats = GraphStats {
        paper_nodes: matrix.paper_elements.len(),
        code_nodes: matrix.code_elements.len(),
        edges: edges.len(),
        traced_paper_nodes: matrix
            .paper_elements
            .iter()
            .filter(|e| traced.contains(e.id.as_str()))
            .count(),
        mean_confidence,
    };
    tracing::debug!(
        "Visualization: {} nodes, {} edges",
        nodes.len(),
        stats.edges
    );

    TraceGraph { nodes, edges, stats }
}
