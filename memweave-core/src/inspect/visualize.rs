//! Text diagram exports.
//!
//! - Mermaid flowcharts of the memory forest and the lattice
//! - DOT/Graphviz for the memory forest
//!
//! # Example
//!
//! ```rust,ignore
//! use memweave_core::inspect::{memory_dot, memory_mermaid, DotConfig};
//!
//! let mermaid = memory_mermaid(&graph);
//! let dot = memory_dot(&graph, &DotConfig::left_to_right());
//! ```

use crate::lattice::{ConceptId, SymbolicLattice};
use crate::topology::TopologicalMemoryGraph;
use std::collections::HashMap;

const MAX_LABEL_CHARS: usize = 50;

/// Configuration for DOT export.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Graph direction: "TB" (top-bottom), "LR" (left-right), etc.
    pub rankdir: String,
    /// Font name for labels.
    pub font_name: String,
    /// Font size for labels.
    pub font_size: u32,
    /// Whether to draw ghost branches.
    pub show_ghosts: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            rankdir: "TB".to_string(),
            font_name: "Helvetica".to_string(),
            font_size: 12,
            show_ghosts: true,
        }
    }
}

impl DotConfig {
    /// Create a left-to-right layout.
    pub fn left_to_right() -> Self {
        Self {
            rankdir: "LR".to_string(),
            ..Default::default()
        }
    }

    /// Conclusions only, no ghosts.
    pub fn conclusions_only() -> Self {
        Self {
            show_ghosts: false,
            ..Default::default()
        }
    }
}

/// Export the memory forest as a Mermaid flowchart.
///
/// Parent to child links are solid; ghost branches hang off their origin
/// on a dashed `rejected` link.
pub fn memory_mermaid(graph: &TopologicalMemoryGraph) -> String {
    let mut mermaid = String::from("graph TD\n");

    for node in graph.nodes() {
        mermaid.push_str(&format!(
            "    n{}[\"{} ({:.2})\"]\n",
            node.id.0.as_simple(),
            mermaid_label(&node.content),
            node.confidence
        ));
    }
    for ghost in graph.ghosts() {
        mermaid.push_str(&format!(
            "    g{}([\"{}\"])\n",
            ghost.id.0.as_simple(),
            mermaid_label(&ghost.content)
        ));
    }

    mermaid.push('\n');

    for node in graph.nodes() {
        for child in &node.children_ids {
            mermaid.push_str(&format!(
                "    n{} --> n{}\n",
                node.id.0.as_simple(),
                child.0.as_simple()
            ));
        }
    }
    for ghost in graph.ghosts() {
        mermaid.push_str(&format!(
            "    n{} -.->|rejected| g{}\n",
            ghost.origin_node_id.0.as_simple(),
            ghost.id.0.as_simple()
        ));
    }

    mermaid.push_str("\n    classDef root fill:#90EE90\n");
    mermaid.push_str("    classDef ghost fill:#FFA07A,stroke-dasharray:5 5\n");

    for root in graph.roots() {
        mermaid.push_str(&format!("    class n{} root\n", root.id.0.as_simple()));
    }
    for ghost in graph.ghosts() {
        mermaid.push_str(&format!("    class g{} ghost\n", ghost.id.0.as_simple()));
    }

    mermaid
}

/// Export the lattice as an undirected Mermaid flowchart.
///
/// Concept ids are arbitrary strings, so nodes are numbered in insertion
/// order and edges carry their relation and weight.
pub fn lattice_mermaid(lattice: &SymbolicLattice) -> String {
    let mut mermaid = String::from("graph LR\n");
    let mut index: HashMap<&ConceptId, usize> = HashMap::new();

    for (i, node) in lattice.nodes().enumerate() {
        index.insert(&node.id, i);
        mermaid.push_str(&format!("    c{}[\"{}\"]\n", i, mermaid_label(&node.label)));
    }

    mermaid.push('\n');

    for edge in lattice.edges() {
        if let (Some(from), Some(to)) = (index.get(&edge.source_id), index.get(&edge.target_id)) {
            mermaid.push_str(&format!(
                "    c{} ---|{} {}| c{}\n",
                from, edge.relation, edge.weight, to
            ));
        }
    }

    mermaid
}

/// Export the memory forest to DOT format.
pub fn memory_dot(graph: &TopologicalMemoryGraph, config: &DotConfig) -> String {
    let mut dot = String::new();

    dot.push_str("digraph MemoryGraph {\n");
    dot.push_str(&format!("    rankdir={};\n", config.rankdir));
    dot.push_str(&format!(
        "    node [fontname=\"{}\", fontsize={}, style=filled];\n",
        config.font_name, config.font_size
    ));
    dot.push_str(&format!(
        "    edge [fontname=\"{}\", fontsize={}];\n",
        config.font_name,
        config.font_size.saturating_sub(2)
    ));
    dot.push('\n');

    for node in graph.nodes() {
        let extra = if node.is_root() { ", penwidth=3" } else { "" };
        dot.push_str(&format!(
            "    n{} [label=\"{}\\n{:.2}\", shape=box, fillcolor=\"#87CEEB\"{}];\n",
            node.id.0.as_simple(),
            escape_dot_string(&truncate(&node.content)),
            node.confidence,
            extra
        ));
    }
    if config.show_ghosts {
        for ghost in graph.ghosts() {
            dot.push_str(&format!(
                "    g{} [label=\"{}\", shape=ellipse, fillcolor=\"#FFA07A\", style=\"filled,dashed\"];\n",
                ghost.id.0.as_simple(),
                escape_dot_string(&truncate(&ghost.content))
            ));
        }
    }

    dot.push('\n');

    for node in graph.nodes() {
        for child in &node.children_ids {
            dot.push_str(&format!(
                "    n{} -> n{};\n",
                node.id.0.as_simple(),
                child.0.as_simple()
            ));
        }
    }
    if config.show_ghosts {
        for ghost in graph.ghosts() {
            dot.push_str(&format!(
                "    n{} -> g{} [label=\"{}\", style=dashed];\n",
                ghost.origin_node_id.0.as_simple(),
                ghost.id.0.as_simple(),
                escape_dot_string(&truncate(&ghost.reason_for_rejection))
            ));
        }
    }

    dot.push_str("}\n");
    dot
}

fn truncate(s: &str) -> String {
    if s.chars().count() > MAX_LABEL_CHARS {
        let head: String = s.chars().take(MAX_LABEL_CHARS).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

fn mermaid_label(s: &str) -> String {
    truncate(s).replace('"', "'").replace('\n', " ")
}

fn escape_dot_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
