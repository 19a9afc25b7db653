//! Sorted and filtered listings for display.

use crate::lattice::{ConceptKind, LatticeNode, SymbolicLattice};
use crate::topology::{GhostBranch, MemoryNode, TopologicalMemoryGraph};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Display order for memory listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Most recent first.
    #[default]
    NewestFirst,
    /// Oldest first.
    OldestFirst,
    /// Highest stored confidence first.
    ConfidenceDesc,
    /// Graph order (by id).
    Identity,
}

/// Query builder for listing memory nodes.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuery {
    /// Case-insensitive substring the content must contain.
    pub content_contains: Option<String>,

    /// Minimum stored confidence.
    pub min_confidence: Option<f64>,

    /// Only list roots.
    pub roots_only: bool,

    /// Result ordering.
    pub order: SortOrder,

    /// Maximum results.
    pub limit: Option<usize>,
}

impl MemoryQuery {
    /// Create a new empty query (newest first, no filters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by content.
    pub fn contains(mut self, text: impl Into<String>) -> Self {
        self.content_contains = Some(text.into());
        self
    }

    /// Filter by minimum stored confidence.
    pub fn min_confidence(mut self, confidence: f64) -> Self {
        self.min_confidence = Some(confidence);
        self
    }

    /// Only list roots.
    pub fn roots_only(mut self) -> Self {
        self.roots_only = true;
        self
    }

    /// Set the ordering.
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Limit results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the query, returning copies of the matching nodes.
    pub fn execute(&self, graph: &TopologicalMemoryGraph) -> Vec<MemoryNode> {
        let needle = self.content_contains.as_ref().map(|t| t.to_lowercase());

        let mut results: Vec<MemoryNode> = graph
            .nodes()
            .filter(|n| !self.roots_only || n.is_root())
            .filter(|n| self.min_confidence.map_or(true, |min| n.confidence >= min))
            .filter(|n| {
                needle
                    .as_ref()
                    .map_or(true, |t| n.content.to_lowercase().contains(t.as_str()))
            })
            .cloned()
            .collect();

        match self.order {
            SortOrder::NewestFirst => results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortOrder::OldestFirst => results.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
            SortOrder::ConfidenceDesc => results.sort_by(|a, b| {
                b.confidence
                    .partial_cmp(&a.confidence)
                    .unwrap_or(Ordering::Equal)
            }),
            SortOrder::Identity => {}
        }

        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}

/// Query builder for listing lattice concepts.
#[derive(Debug, Clone, Default)]
pub struct ConceptQuery {
    /// Case-insensitive substring the label must contain.
    pub label_contains: Option<String>,

    /// Restrict to one kind of concept.
    pub kind: Option<ConceptKind>,

    /// Maximum results.
    pub limit: Option<usize>,
}

impl ConceptQuery {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by label.
    pub fn label_contains(mut self, text: impl Into<String>) -> Self {
        self.label_contains = Some(text.into());
        self
    }

    /// Filter by kind.
    pub fn kind(mut self, kind: ConceptKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Limit results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the query. Results are sorted by label.
    pub fn execute(&self, lattice: &SymbolicLattice) -> Vec<LatticeNode> {
        let needle = self.label_contains.as_ref().map(|t| t.to_lowercase());

        let mut results: Vec<LatticeNode> = lattice
            .nodes()
            .filter(|n| self.kind.map_or(true, |k| n.kind == k))
            .filter(|n| {
                needle
                    .as_ref()
                    .map_or(true, |t| n.label.to_lowercase().contains(t.as_str()))
            })
            .cloned()
            .collect();

        results.sort_by(|a, b| a.label.cmp(&b.label));
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}

/// Copies of all ghost branches, most recent first.
pub fn ghosts_newest_first(graph: &TopologicalMemoryGraph) -> Vec<GhostBranch> {
    let mut ghosts = graph.get_all_ghost_branches();
    ghosts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    ghosts
}
