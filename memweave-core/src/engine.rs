//! Shareable service owning both graphs.
//!
//! `MemoryEngine` is constructed explicitly and handed around as
//! `Arc<MemoryEngine>`. Each graph sits behind its own `RwLock`: mutations
//! take the write lock, reads take the read lock and return owned copies.
//! There is no transaction spanning both graphs.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::lattice::{
    ActivatedSubgraph, ActivationPath, ConceptId, IngestReport, LatticeEdge, LatticeNode,
    SymbolicLattice,
};
use crate::snapshot::EngineSnapshot;
use crate::topology::{GhostBranch, MemoryNode, MemoryNodeId, TopologicalMemoryGraph};
use chrono::{DateTime, Utc};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, instrument};

/// Dual-graph memory engine.
#[derive(Debug)]
pub struct MemoryEngine {
    config: EngineConfig,
    memory: RwLock<TopologicalMemoryGraph>,
    lattice: RwLock<SymbolicLattice>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

impl MemoryEngine {
    /// Create an empty engine after validating the configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Rebuild an engine from a snapshot.
    ///
    /// Both graphs are re-validated: a broken forest or a dangling lattice
    /// edge fails the whole restore.
    pub fn restore(config: EngineConfig, snapshot: EngineSnapshot) -> Result<Self> {
        config.validate()?;

        let memory = TopologicalMemoryGraph::from_snapshot(snapshot.memory, config.decay.policy())?;
        let lattice = SymbolicLattice::from_snapshot(snapshot.lattice, config.lattice.clone())?;

        info!(
            captured_at = %snapshot.captured_at,
            memory_nodes = memory.node_count(),
            ghosts = memory.ghost_count(),
            concepts = lattice.node_count(),
            relations = lattice.edge_count(),
            "Restored memory engine"
        );

        Ok(Self {
            config,
            memory: RwLock::new(memory),
            lattice: RwLock::new(lattice),
        })
    }

    fn build(config: EngineConfig) -> Self {
        let memory = TopologicalMemoryGraph::with_decay(config.decay.policy());
        let lattice = SymbolicLattice::with_config(config.lattice.clone());
        Self {
            config,
            memory: RwLock::new(memory),
            lattice: RwLock::new(lattice),
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Capture both graphs. Each graph is read under its own lock.
    pub fn snapshot(&self) -> Result<EngineSnapshot> {
        let memory = self.with_memory(|g| g.snapshot())?;
        let lattice = self.with_lattice(|l| l.snapshot())?;
        Ok(EngineSnapshot {
            captured_at: Utc::now(),
            memory,
            lattice,
        })
    }

    // ==================== Lock Helpers ====================

    fn memory_read(&self) -> Result<RwLockReadGuard<'_, TopologicalMemoryGraph>> {
        self.memory
            .read()
            .map_err(|e| Error::Internal(format!("Failed to lock memory graph: {}", e)))
    }

    fn memory_write(&self) -> Result<RwLockWriteGuard<'_, TopologicalMemoryGraph>> {
        self.memory
            .write()
            .map_err(|e| Error::Internal(format!("Failed to lock memory graph: {}", e)))
    }

    fn lattice_read(&self) -> Result<RwLockReadGuard<'_, SymbolicLattice>> {
        self.lattice
            .read()
            .map_err(|e| Error::Internal(format!("Failed to lock lattice: {}", e)))
    }

    fn lattice_write(&self) -> Result<RwLockWriteGuard<'_, SymbolicLattice>> {
        self.lattice
            .write()
            .map_err(|e| Error::Internal(format!("Failed to lock lattice: {}", e)))
    }

    /// Run a read-only closure against the memory graph.
    ///
    /// Pairs with the [`crate::inspect`] helpers, e.g.
    /// `engine.with_memory(|g| MemoryQuery::new().limit(10).execute(g))`.
    pub fn with_memory<T>(&self, f: impl FnOnce(&TopologicalMemoryGraph) -> T) -> Result<T> {
        let graph = self.memory_read()?;
        Ok(f(&graph))
    }

    /// Run a read-only closure against the lattice.
    pub fn with_lattice<T>(&self, f: impl FnOnce(&SymbolicLattice) -> T) -> Result<T> {
        let lattice = self.lattice_read()?;
        Ok(f(&lattice))
    }

    // ==================== Memory Graph ====================

    /// Insert a conclusion. See [`TopologicalMemoryGraph::insert_node`].
    #[instrument(skip(self, content, parent_id), fields(parent = ?parent_id))]
    pub fn insert_node(
        &self,
        content: impl Into<String>,
        confidence: f64,
        parent_id: Option<&MemoryNodeId>,
    ) -> Result<MemoryNode> {
        self.memory_write()?.insert_node(content, confidence, parent_id)
    }

    /// Record a rejected alternative. See [`TopologicalMemoryGraph::record_ghost`].
    #[instrument(skip(self, content, reason_for_rejection, origin_id), fields(origin = %origin_id))]
    pub fn record_ghost(
        &self,
        content: impl Into<String>,
        reason_for_rejection: impl Into<String>,
        origin_id: &MemoryNodeId,
    ) -> Result<GhostBranch> {
        self.memory_write()?
            .record_ghost(content, reason_for_rejection, origin_id)
    }

    /// Delete a node, re-parenting its children.
    #[instrument(skip(self, id), fields(node = %id))]
    pub fn delete_node(&self, id: &MemoryNodeId) -> Result<()> {
        self.memory_write()?.delete_node(id)
    }

    /// Overwrite a node's stored confidence.
    #[instrument(skip(self, id), fields(node = %id))]
    pub fn reassign_confidence(&self, id: &MemoryNodeId, confidence: f64) -> Result<()> {
        self.memory_write()?.reassign_confidence(id, confidence)
    }

    /// Prune nodes whose effective confidence is now below `threshold`.
    #[instrument(skip(self))]
    pub fn prune_memory(&self, threshold: f64) -> Result<usize> {
        Ok(self.memory_write()?.prune_memory(threshold))
    }

    /// Prune against an explicit evaluation instant.
    #[instrument(skip(self))]
    pub fn prune_memory_at(&self, threshold: f64, now: DateTime<Utc>) -> Result<usize> {
        Ok(self.memory_write()?.prune_memory_at(threshold, now))
    }

    /// Copy of one memory node.
    pub fn memory_node(&self, id: &MemoryNodeId) -> Result<Option<MemoryNode>> {
        self.with_memory(|g| g.get_node(id).cloned())
    }

    /// Copies of every memory node, ordered by id.
    pub fn get_all_nodes(&self) -> Result<Vec<MemoryNode>> {
        self.with_memory(|g| g.get_all_nodes())
    }

    /// Copies of every ghost branch, ordered by id.
    pub fn get_all_ghost_branches(&self) -> Result<Vec<GhostBranch>> {
        self.with_memory(|g| g.get_all_ghost_branches())
    }

    // ==================== Symbolic Lattice ====================

    /// Insert a concept node by id.
    #[instrument(skip(self, node), fields(concept = %node.id))]
    pub fn add_node(&self, node: LatticeNode) -> Result<()> {
        self.lattice_write()?.add_node(node)
    }

    /// Insert a relation between existing concepts.
    #[instrument(skip(self, edge), fields(source = %edge.source_id, target = %edge.target_id))]
    pub fn add_edge(&self, edge: LatticeEdge) -> Result<()> {
        self.lattice_write()?.add_edge(edge)
    }

    /// Merge a batch of extracted tags into the lattice.
    #[instrument(skip(self, tags), fields(tag_count = tags.len()))]
    pub fn ingest_semantic_tags<S: AsRef<str>>(&self, tags: &[S]) -> Result<IngestReport> {
        self.lattice_write()?.ingest_semantic_tags(tags)
    }

    /// Copy of one concept node.
    pub fn get_node(&self, id: &ConceptId) -> Result<Option<LatticeNode>> {
        self.with_lattice(|l| l.get_node(id).cloned())
    }

    /// Copies of every concept node, in insertion order.
    pub fn get_nodes(&self) -> Result<Vec<LatticeNode>> {
        self.with_lattice(|l| l.get_nodes())
    }

    /// Copies of every relation, in insertion order.
    pub fn get_edges(&self) -> Result<Vec<LatticeEdge>> {
        self.with_lattice(|l| l.get_edges())
    }

    /// Shortest hop-count route between two labels.
    pub fn find_activation_path(
        &self,
        start_label: &str,
        end_label: &str,
    ) -> Result<Option<ActivationPath>> {
        self.with_lattice(|l| l.find_activation_path(start_label, end_label))
    }

    /// Concepts carrying any of `labels`, with the edges among them.
    pub fn get_activated_subgraph<S: AsRef<str>>(&self, labels: &[S]) -> Result<ActivatedSubgraph> {
        self.with_lattice(|l| l.get_activated_subgraph(labels))
    }
}
