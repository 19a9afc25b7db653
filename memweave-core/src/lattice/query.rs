//! Connectivity queries over the symbolic lattice.

use crate::lattice::graph::SymbolicLattice;
use crate::lattice::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};

/// Shortest route between two concepts, endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationPath {
    /// Nodes from start to end.
    pub nodes: Vec<LatticeNode>,
}

impl ActivationPath {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// Number of nodes on the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in path order.
    pub fn ids(&self) -> Vec<&ConceptId> {
        self.nodes.iter().map(|n| &n.id).collect()
    }

    /// Labels in path order.
    pub fn labels(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.label.as_str()).collect()
    }

    /// Render as `A -> B -> C`.
    pub fn summary(&self) -> String {
        self.labels().join(" -> ")
    }
}

/// Nodes matching a label set plus the edges running strictly between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivatedSubgraph {
    /// Activated nodes, in lattice insertion order.
    pub nodes: Vec<LatticeNode>,

    /// Edges whose endpoints are both activated.
    pub edges: Vec<LatticeEdge>,
}

impl ActivatedSubgraph {
    /// Whether nothing was activated.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SymbolicLattice {
    /// Find the shortest path (by edge count) between two labelled concepts.
    ///
    /// Each label resolves to the first node inserted with it; an unknown
    /// label yields `None`, as does a pair with no connecting route. Edges
    /// are walked in both directions and their weights are ignored: weight
    /// measures association strength, not traversal cost.
    pub fn find_activation_path(&self, start_label: &str, end_label: &str) -> Option<ActivationPath> {
        let start = self.labels.get(start_label)?;
        let end = self.labels.get(end_label)?;

        let adjacency = self.adjacency();
        let mut previous: HashMap<&ConceptId, &ConceptId> = HashMap::new();
        let mut visited: HashSet<&ConceptId> = HashSet::from([start]);
        let mut queue: VecDeque<&ConceptId> = VecDeque::from([start]);

        // BFS traversal
        while let Some(current) = queue.pop_front() {
            if current == end {
                break;
            }
            for &next in adjacency.get(current).into_iter().flatten() {
                if visited.insert(next) {
                    previous.insert(next, current);
                    queue.push_back(next);
                }
            }
        }

        if !visited.contains(end) {
            return None;
        }

        let mut ids = vec![end];
        let mut cursor = end;
        while let Some(&prev) = previous.get(cursor) {
            ids.push(prev);
            cursor = prev;
        }
        ids.reverse();

        let nodes = ids
            .into_iter()
            .filter_map(|id| self.store.get_node(id).cloned())
            .collect();
        Some(ActivationPath { nodes })
    }

    /// Select every node whose label exactly (case-sensitively) equals one of
    /// `labels`, plus only the edges whose endpoints are both selected.
    ///
    /// Activation does not spread: a neighbour that is not itself named
    /// stays out, and so does the edge leading to it.
    pub fn get_activated_subgraph<S: AsRef<str>>(&self, labels: &[S]) -> ActivatedSubgraph {
        let wanted: HashSet<&str> = labels.iter().map(|l| l.as_ref()).collect();

        let nodes: Vec<LatticeNode> = self
            .nodes()
            .filter(|n| wanted.contains(n.label.as_str()))
            .cloned()
            .collect();

        let active: HashSet<&ConceptId> = nodes.iter().map(|n| &n.id).collect();
        let edges = self
            .store
            .edges()
            .iter()
            .filter(|e| active.contains(&e.source_id) && active.contains(&e.target_id))
            .cloned()
            .collect();

        ActivatedSubgraph { nodes, edges }
    }

    /// Undirected adjacency in edge insertion order.
    fn adjacency(&self) -> HashMap<&ConceptId, Vec<&ConceptId>> {
        let mut adjacency: HashMap<&ConceptId, Vec<&ConceptId>> = HashMap::new();
        for edge in self.store.edges() {
            adjacency
                .entry(&edge.source_id)
                .or_default()
                .push(&edge.target_id);
            adjacency
                .entry(&edge.target_id)
                .or_default()
                .push(&edge.source_id);
        }
        adjacency
    }
}
