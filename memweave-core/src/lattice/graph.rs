//! The symbolic lattice: concept nodes, typed relations, and tag ingestion.

use crate::config::LatticeConfig;
use crate::error::{Error, Result};
use crate::lattice::types::*;
use crate::snapshot::LatticeSnapshot;
use crate::store::GraphStore;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Graph of concepts and the relations between them.
///
/// `add_node`/`add_edge` are the low-level entry points: they check id
/// uniqueness and endpoint existence but never merge. Label merging and
/// co-occurrence strengthening happen in [`SymbolicLattice::ingest_semantic_tags`].
#[derive(Debug, Clone, Default)]
pub struct SymbolicLattice {
    pub(super) store: GraphStore<LatticeNode, LatticeEdge>,
    /// Node ids in insertion order.
    pub(super) order: Vec<ConceptId>,
    /// First node inserted for each label.
    pub(super) labels: HashMap<String, ConceptId>,
    /// Index of the first `co_occurring` edge joining each unordered pair.
    co_occurrence: HashMap<(ConceptId, ConceptId), usize>,
    config: LatticeConfig,
}

/// Order-independent key for a pair of concepts.
fn pair_key(a: &ConceptId, b: &ConceptId) -> (ConceptId, ConceptId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl SymbolicLattice {
    /// Create an empty lattice with default ingestion settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty lattice with explicit ingestion settings.
    pub fn with_config(config: LatticeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Rebuild a lattice from a snapshot, re-checking ids and endpoints.
    ///
    /// Nodes are re-added in snapshot order, so label resolution matches the
    /// lattice the snapshot was taken from.
    pub fn from_snapshot(snapshot: LatticeSnapshot, config: LatticeConfig) -> Result<Self> {
        let mut lattice = Self::with_config(config);
        for node in snapshot.nodes {
            lattice.add_node(node)?;
        }
        for edge in snapshot.edges {
            lattice
                .add_edge(edge)
                .map_err(|e| Error::integrity(format!("snapshot edge rejected: {}", e)))?;
        }
        Ok(lattice)
    }

    /// Capture nodes (insertion order) and edges.
    pub fn snapshot(&self) -> LatticeSnapshot {
        LatticeSnapshot {
            nodes: self.get_nodes(),
            edges: self.get_edges(),
        }
    }

    // ==================== Low-level Mutations ====================

    /// Insert a node by id. Labels are not deduplicated here.
    ///
    /// Confidence must be a finite value in [0, 1].
    pub fn add_node(&mut self, node: LatticeNode) -> Result<()> {
        if !(node.confidence.is_finite() && (0.0..=1.0).contains(&node.confidence)) {
            warn!(concept = %node.id, confidence = node.confidence, "Rejected concept with invalid confidence");
            return Err(Error::InvalidConfidence(node.confidence));
        }

        let id = node.id.clone();
        let label = node.label.clone();

        self.store.insert_node(node).map_err(|e| {
            warn!(concept = %id, "Rejected duplicate concept id");
            e
        })?;
        self.order.push(id.clone());
        self.labels.entry(label).or_insert(id);
        Ok(())
    }

    /// Insert an edge whose endpoints both exist. Parallel edges are allowed.
    ///
    /// Weight must be finite and non-negative.
    pub fn add_edge(&mut self, edge: LatticeEdge) -> Result<()> {
        if !(edge.weight.is_finite() && edge.weight >= 0.0) {
            warn!(
                source = %edge.source_id,
                target = %edge.target_id,
                weight = edge.weight,
                "Rejected edge with invalid weight"
            );
            return Err(Error::InvalidWeight(edge.weight));
        }
        for endpoint in [&edge.source_id, &edge.target_id] {
            if !self.store.contains_node(endpoint) {
                warn!(
                    source = %edge.source_id,
                    target = %edge.target_id,
                    "Rejected edge with dangling endpoint"
                );
                return Err(Error::dangling_endpoint(
                    &edge.source_id,
                    &edge.target_id,
                    endpoint,
                ));
            }
        }
        self.push_edge(edge);
        Ok(())
    }

    /// Append a validated edge and index it if it is a co-occurrence.
    fn push_edge(&mut self, edge: LatticeEdge) {
        let key = (edge.relation == RelationType::CoOccurring)
            .then(|| pair_key(&edge.source_id, &edge.target_id));
        let index = self.store.push_edge(edge);
        if let Some(key) = key {
            self.co_occurrence.entry(key).or_insert(index);
        }
    }

    // ==================== Ingestion ====================

    /// Ingest one batch of extracted semantic tags.
    ///
    /// Each label maps to exactly one concept: an existing node with that
    /// label is reused, otherwise a new `concept` node is created. Every
    /// unordered pair of distinct labels in the batch then gets a
    /// `co_occurring` edge, either freshly created at the configured initial
    /// weight or, if one already joins the pair in either direction,
    /// strengthened by the configured increment.
    ///
    /// Labels are taken verbatim. Repeats within the batch count once and
    /// empty labels are skipped.
    pub fn ingest_semantic_tags<S: AsRef<str>>(&mut self, tags: &[S]) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut batch: Vec<ConceptId> = Vec::new();

        for tag in tags {
            let label = tag.as_ref();
            if label.is_empty() {
                report.skipped += 1;
                continue;
            }
            if !seen.insert(label) {
                continue;
            }

            let id = match self.labels.get(label) {
                Some(existing) => {
                    report.concepts_reused += 1;
                    existing.clone()
                }
                None => {
                    let node = LatticeNode::concept(label)
                        .with_confidence(self.config.concept_confidence);
                    let id = node.id.clone();
                    self.add_node(node)?;
                    report.concepts_created.push(id.clone());
                    id
                }
            };
            batch.push(id);
        }

        let initial = self.config.initial_edge_weight;
        let increment = self.config.weight_increment;
        for (i, a) in batch.iter().enumerate() {
            for b in &batch[i + 1..] {
                let existing = self
                    .co_occurrence
                    .get(&pair_key(a, b))
                    .copied()
                    .and_then(|index| self.store.edge_mut(index));
                match existing {
                    Some(edge) => {
                        edge.weight += increment;
                        report.edges_strengthened += 1;
                    }
                    None => {
                        self.push_edge(
                            LatticeEdge::co_occurring(a.clone(), b.clone()).with_weight(initial),
                        );
                        report.edges_created += 1;
                    }
                }
            }
        }

        debug!(
            created = report.concepts_created.len(),
            reused = report.concepts_reused,
            edges_created = report.edges_created,
            edges_strengthened = report.edges_strengthened,
            "Ingested semantic tags"
        );
        Ok(report)
    }

    // ==================== Reads ====================

    /// Get a node by ID.
    pub fn get_node(&self, id: &ConceptId) -> Option<&LatticeNode> {
        self.store.get_node(id)
    }

    /// Copies of all nodes in insertion order.
    pub fn get_nodes(&self) -> Vec<LatticeNode> {
        self.nodes().cloned().collect()
    }

    /// Copies of all edges in insertion order.
    pub fn get_edges(&self) -> Vec<LatticeEdge> {
        self.store.edges().to_vec()
    }

    /// Iterate over nodes in insertion order without copying.
    pub fn nodes(&self) -> impl Iterator<Item = &LatticeNode> {
        self.order.iter().filter_map(|id| self.store.get_node(id))
    }

    /// All edges in insertion order without copying.
    pub fn edges(&self) -> &[LatticeEdge] {
        self.store.edges()
    }

    /// The first node inserted with this exact label.
    pub fn find_node_by_label(&self, label: &str) -> Option<&LatticeNode> {
        self.labels.get(label).and_then(|id| self.store.get_node(id))
    }

    /// Nodes sharing an edge with `id` (either direction), each listed once.
    pub fn neighbors(&self, id: &ConceptId) -> Vec<&LatticeNode> {
        let mut seen = HashSet::new();
        self.store
            .edges()
            .iter()
            .filter_map(|e| e.other_end(id))
            .filter(|other| seen.insert(*other))
            .filter_map(|other| self.store.get_node(other))
            .collect()
    }

    /// Edges joining `a` and `b` in either direction.
    pub fn edges_between(&self, a: &ConceptId, b: &ConceptId) -> Vec<&LatticeEdge> {
        self.store
            .edges()
            .iter()
            .filter(|e| e.connects(a, b))
            .collect()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.store.edge_count()
    }

    /// Get lattice statistics.
    pub fn stats(&self) -> LatticeStats {
        let mut relation_counts: HashMap<RelationType, usize> = HashMap::new();
        for edge in self.store.edges() {
            *relation_counts.entry(edge.relation).or_default() += 1;
        }

        let strongest = self
            .store
            .edges()
            .iter()
            .filter(|e| e.relation == RelationType::CoOccurring)
            .map(|e| e.weight)
            .fold(0.0_f64, f64::max);

        LatticeStats {
            node_count: self.store.node_count(),
            edge_count: self.store.edge_count(),
            relation_counts,
            strongest_co_occurrence: strongest,
        }
    }
}

/// What a call to [`SymbolicLattice::ingest_semantic_tags`] changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Ids of concepts created for previously unseen labels.
    pub concepts_created: Vec<ConceptId>,

    /// Labels that resolved to an existing concept.
    pub concepts_reused: usize,

    /// Co-occurrence edges created.
    pub edges_created: usize,

    /// Co-occurrence edges whose weight was increased.
    pub edges_strengthened: usize,

    /// Empty labels ignored.
    pub skipped: usize,
}

/// Statistics about the lattice.
#[derive(Debug, Clone)]
pub struct LatticeStats {
    /// Total number of concepts.
    pub node_count: usize,

    /// Total number of relations.
    pub edge_count: usize,

    /// Count by relation type.
    pub relation_counts: HashMap<RelationType, usize>,

    /// Highest co-occurrence weight, 0.0 if there is none.
    pub strongest_co_occurrence: f64,
}
