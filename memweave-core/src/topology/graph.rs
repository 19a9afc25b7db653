//! The topological memory graph: a forest of conclusions plus ghost branches.

use crate::decay::{DecayPolicy, ExponentialDecay};
use crate::error::{Error, Result};
use crate::snapshot::MemorySnapshot;
use crate::store::GraphStore;
use crate::topology::types::*;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Forest of confidence-weighted conclusions with their rejected alternatives.
///
/// Structural references are validated on the way in, so every `parent_id`,
/// `children_ids` entry, ghost id and ghost origin always resolves.
///
/// Deleting a node re-parents its children to the deleted node's parent
/// (children of a deleted root become roots) and drops the node's ghosts.
/// Pruning follows the same rule.
#[derive(Debug, Clone)]
pub struct TopologicalMemoryGraph {
    nodes: GraphStore<MemoryNode>,
    ghosts: GraphStore<GhostBranch>,
    decay: Arc<dyn DecayPolicy>,
}

impl Default for TopologicalMemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologicalMemoryGraph {
    /// Create an empty graph with the default exponential decay.
    pub fn new() -> Self {
        Self::with_decay(Arc::new(ExponentialDecay::default()))
    }

    /// Create an empty graph with a specific decay policy.
    pub fn with_decay(decay: Arc<dyn DecayPolicy>) -> Self {
        Self {
            nodes: GraphStore::new(),
            ghosts: GraphStore::new(),
            decay,
        }
    }

    /// Rebuild a graph from a snapshot, verifying referential integrity.
    pub fn from_snapshot(snapshot: MemorySnapshot, decay: Arc<dyn DecayPolicy>) -> Result<Self> {
        let graph = Self {
            nodes: GraphStore::from_parts(snapshot.nodes, Vec::new())?,
            ghosts: GraphStore::from_parts(snapshot.ghosts, Vec::new())?,
            decay,
        };
        graph.verify_integrity()?;
        Ok(graph)
    }

    /// Capture every node and ghost in id order.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            nodes: self.get_all_nodes(),
            ghosts: self.get_all_ghost_branches(),
        }
    }

    /// The decay policy used for effective confidence.
    pub fn decay_policy(&self) -> &dyn DecayPolicy {
        self.decay.as_ref()
    }

    // ==================== Mutations ====================

    /// Insert a conclusion, optionally derived from an existing node.
    ///
    /// Confidence is clamped into [0, 1]; NaN and infinities are rejected.
    pub fn insert_node(
        &mut self,
        content: impl Into<String>,
        confidence: f64,
        parent_id: Option<&MemoryNodeId>,
    ) -> Result<MemoryNode> {
        let confidence = checked_confidence(confidence)?;

        if let Some(parent) = parent_id {
            if !self.nodes.contains_node(parent) {
                warn!(parent = %parent, "Rejected memory node with unknown parent");
                return Err(Error::InvalidParent(parent.to_string()));
            }
        }

        let node = MemoryNode::new(content, confidence, parent_id.cloned());
        let id = node.id.clone();
        self.nodes.insert_node(node.clone())?;

        if let Some(parent) = parent_id.and_then(|p| self.nodes.get_node_mut(p)) {
            parent.children_ids.push(id.clone());
        }

        debug!(node = %id, parent = ?parent_id.map(|p| p.to_string()), confidence, "Inserted memory node");
        Ok(node)
    }

    /// Record an alternative that was rejected in favour of `origin_id`.
    ///
    /// Fails with `InvalidOrigin` if the origin does not exist or the reason
    /// is empty (whitespace only counts as empty).
    pub fn record_ghost(
        &mut self,
        content: impl Into<String>,
        reason_for_rejection: impl Into<String>,
        origin_id: &MemoryNodeId,
    ) -> Result<GhostBranch> {
        let reason = reason_for_rejection.into();

        if !self.nodes.contains_node(origin_id) {
            warn!(origin = %origin_id, "Rejected ghost branch with unknown origin");
            return Err(Error::invalid_origin(origin_id, "memory node does not exist"));
        }
        if reason.trim().is_empty() {
            warn!(origin = %origin_id, "Rejected ghost branch without a rejection reason");
            return Err(Error::invalid_origin(origin_id, "rejection reason is empty"));
        }

        let ghost = GhostBranch::new(content, reason, origin_id.clone());
        self.ghosts.insert_node(ghost.clone())?;

        if let Some(origin) = self.nodes.get_node_mut(origin_id) {
            origin.ghost_branch_ids.push(ghost.id.clone());
        }

        debug!(ghost = %ghost.id, origin = %origin_id, "Recorded ghost branch");
        Ok(ghost)
    }

    /// Delete a node, re-parenting its children and dropping its ghosts.
    pub fn delete_node(&mut self, id: &MemoryNodeId) -> Result<()> {
        let ghosts_removed = self.detach(id)?;
        debug!(node = %id, ghosts_removed, "Deleted memory node");
        Ok(())
    }

    /// Replace a node's stored confidence.
    pub fn reassign_confidence(&mut self, id: &MemoryNodeId, confidence: f64) -> Result<()> {
        let confidence = checked_confidence(confidence)?;
        let node = self
            .nodes
            .get_node_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        node.confidence = confidence;
        Ok(())
    }

    /// Prune every node whose effective confidence right now is below `threshold`.
    pub fn prune_memory(&mut self, threshold: f64) -> usize {
        self.prune_memory_at(threshold, Utc::now())
    }

    /// Prune every node whose effective confidence at `now` is strictly below
    /// `threshold`, returning the number of nodes removed.
    ///
    /// Candidates are chosen before any removal. Re-parenting never changes a
    /// node's confidence, so the outcome does not depend on removal order.
    pub fn prune_memory_at(&mut self, threshold: f64, now: DateTime<Utc>) -> usize {
        let victims: Vec<MemoryNodeId> = self
            .nodes
            .nodes()
            .filter(|n| self.decay.effective_confidence(n.confidence, n.timestamp, now) < threshold)
            .map(|n| n.id.clone())
            .collect();

        let mut removed = 0;
        let mut ghosts_removed = 0;
        for id in &victims {
            if let Ok(ghosts) = self.detach(id) {
                removed += 1;
                ghosts_removed += ghosts;
            }
        }

        info!(
            threshold,
            removed,
            ghosts_removed,
            remaining = self.nodes.node_count(),
            "Pruned memory graph"
        );
        removed
    }

    /// Remove a node and repair the forest around it. Returns the number of
    /// ghosts dropped with it.
    fn detach(&mut self, id: &MemoryNodeId) -> Result<usize> {
        let node = self
            .nodes
            .remove_node(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        for ghost_id in &node.ghost_branch_ids {
            self.ghosts.remove_node(ghost_id);
        }

        for child_id in &node.children_ids {
            if let Some(child) = self.nodes.get_node_mut(child_id) {
                child.parent_id = node.parent_id.clone();
            }
        }

        // Children take the deleted node's slot in the grandparent's list.
        if let Some(parent) = node
            .parent_id
            .as_ref()
            .and_then(|p| self.nodes.get_node_mut(p))
        {
            let slot = parent
                .children_ids
                .iter()
                .position(|c| c == id)
                .unwrap_or(parent.children_ids.len());
            parent.children_ids.retain(|c| c != id);
            for (offset, child_id) in node.children_ids.iter().enumerate() {
                parent.children_ids.insert(slot + offset, child_id.clone());
            }
        }

        Ok(node.ghost_branch_ids.len())
    }

    // ==================== Reads ====================

    /// Get a node by ID.
    pub fn get_node(&self, id: &MemoryNodeId) -> Option<&MemoryNode> {
        self.nodes.get_node(id)
    }

    /// Get a ghost branch by ID.
    pub fn get_ghost(&self, id: &GhostId) -> Option<&GhostBranch> {
        self.ghosts.get_node(id)
    }

    /// Whether the node exists.
    pub fn contains(&self, id: &MemoryNodeId) -> bool {
        self.nodes.contains_node(id)
    }

    /// Copies of all nodes, ordered by id.
    pub fn get_all_nodes(&self) -> Vec<MemoryNode> {
        self.nodes.nodes().cloned().collect()
    }

    /// Copies of all ghost branches, ordered by id.
    pub fn get_all_ghost_branches(&self) -> Vec<GhostBranch> {
        self.ghosts.nodes().cloned().collect()
    }

    /// Iterate over nodes in id order without copying.
    pub fn nodes(&self) -> impl Iterator<Item = &MemoryNode> {
        self.nodes.nodes()
    }

    /// Iterate over ghosts in id order without copying.
    pub fn ghosts(&self) -> impl Iterator<Item = &GhostBranch> {
        self.ghosts.nodes()
    }

    /// Number of memory nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.node_count()
    }

    /// Number of ghost branches.
    pub fn ghost_count(&self) -> usize {
        self.ghosts.node_count()
    }

    /// All root nodes.
    pub fn roots(&self) -> Vec<&MemoryNode> {
        self.nodes.nodes().filter(|n| n.is_root()).collect()
    }

    /// Direct children of a node, in derivation order.
    pub fn children(&self, id: &MemoryNodeId) -> Vec<&MemoryNode> {
        self.nodes
            .get_node(id)
            .map(|n| {
                n.children_ids
                    .iter()
                    .filter_map(|c| self.nodes.get_node(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ghost branches recorded at a node.
    pub fn ghosts_of(&self, id: &MemoryNodeId) -> Vec<&GhostBranch> {
        self.nodes
            .get_node(id)
            .map(|n| {
                n.ghost_branch_ids
                    .iter()
                    .filter_map(|g| self.ghosts.get_node(g))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Path from the node's root down to the node itself.
    ///
    /// Empty if the node does not exist.
    pub fn path_to_root(&self, id: &MemoryNodeId) -> Vec<&MemoryNode> {
        let mut path = Vec::new();
        let mut current = self.nodes.get_node(id);
        while let Some(node) = current {
            path.push(node);
            if path.len() > self.nodes.node_count() {
                break;
            }
            current = node.parent_id.as_ref().and_then(|p| self.nodes.get_node(p));
        }
        path.reverse();
        path
    }

    /// All nodes derived (transitively) from `id`, depth-first, excluding `id`.
    pub fn descendants(&self, id: &MemoryNodeId) -> Vec<&MemoryNode> {
        let mut result = Vec::new();
        let mut stack: Vec<&MemoryNodeId> = match self.nodes.get_node(id) {
            Some(node) => node.children_ids.iter().rev().collect(),
            None => return result,
        };

        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_node(current) {
                result.push(node);
                // Push children in reverse order for correct DFS order
                stack.extend(node.children_ids.iter().rev());
            }
        }
        result
    }

    /// Effective confidence of a node at `now`.
    pub fn effective_confidence(&self, id: &MemoryNodeId, now: DateTime<Utc>) -> Option<f64> {
        self.nodes
            .get_node(id)
            .map(|n| self.decay.effective_confidence(n.confidence, n.timestamp, now))
    }

    /// Get graph statistics.
    pub fn stats(&self) -> MemoryGraphStats {
        let roots = self.roots();

        // Explicit stack: derivation chains may be arbitrarily deep.
        let mut max_depth = 0;
        let mut stack: Vec<(&MemoryNodeId, usize)> = roots.iter().map(|r| (&r.id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.nodes.get_node(id) {
                stack.extend(node.children_ids.iter().map(|c| (c, depth + 1)));
            }
        }

        MemoryGraphStats {
            node_count: self.nodes.node_count(),
            ghost_count: self.ghosts.node_count(),
            root_count: roots.len(),
            leaf_count: self.nodes.nodes().filter(|n| n.is_leaf()).count(),
            max_depth,
        }
    }

    // ==================== Integrity ====================

    /// Check the forest and ghost invariants.
    ///
    /// Mutations preserve these by construction; this is the gate for
    /// snapshots restored from outside.
    pub fn verify_integrity(&self) -> Result<()> {
        for node in self.nodes.nodes() {
            if !(node.confidence.is_finite() && (0.0..=1.0).contains(&node.confidence)) {
                return Err(Error::integrity(format!(
                    "node {} has confidence {} outside [0, 1]",
                    node.id, node.confidence
                )));
            }

            if let Some(parent_id) = &node.parent_id {
                let parent = self.nodes.get_node(parent_id).ok_or_else(|| {
                    Error::integrity(format!("node {} has missing parent {}", node.id, parent_id))
                })?;
                let listed = parent.children_ids.iter().filter(|c| *c == &node.id).count();
                if listed != 1 {
                    return Err(Error::integrity(format!(
                        "node {} is listed {} times by its parent {}",
                        node.id, listed, parent_id
                    )));
                }
            }

            let mut seen = HashSet::new();
            for child_id in &node.children_ids {
                if !seen.insert(child_id) {
                    return Err(Error::integrity(format!(
                        "node {} lists child {} twice",
                        node.id, child_id
                    )));
                }
                let child = self.nodes.get_node(child_id).ok_or_else(|| {
                    Error::integrity(format!("node {} has missing child {}", node.id, child_id))
                })?;
                if child.parent_id.as_ref() != Some(&node.id) {
                    return Err(Error::integrity(format!(
                        "child {} does not name {} as its parent",
                        child_id, node.id
                    )));
                }
            }

            let mut seen_ghosts = HashSet::new();
            for ghost_id in &node.ghost_branch_ids {
                if !seen_ghosts.insert(ghost_id) {
                    return Err(Error::integrity(format!(
                        "node {} lists ghost {} twice",
                        node.id, ghost_id
                    )));
                }
                let ghost = self.ghosts.get_node(ghost_id).ok_or_else(|| {
                    Error::integrity(format!("node {} has missing ghost {}", node.id, ghost_id))
                })?;
                if ghost.origin_node_id != node.id {
                    return Err(Error::integrity(format!(
                        "ghost {} is listed by {} but originates at {}",
                        ghost_id, node.id, ghost.origin_node_id
                    )));
                }
            }
        }

        for ghost in self.ghosts.nodes() {
            let origin = self.nodes.get_node(&ghost.origin_node_id).ok_or_else(|| {
                Error::integrity(format!(
                    "ghost {} has missing origin {}",
                    ghost.id, ghost.origin_node_id
                ))
            })?;
            if !origin.ghost_branch_ids.contains(&ghost.id) {
                return Err(Error::integrity(format!(
                    "ghost {} is not listed by its origin {}",
                    ghost.id, origin.id
                )));
            }
            if ghost.reason_for_rejection.trim().is_empty() {
                return Err(Error::integrity(format!(
                    "ghost {} has an empty rejection reason",
                    ghost.id
                )));
            }
        }

        // Walking up from any node must reach a root within node_count steps.
        let limit = self.nodes.node_count();
        for node in self.nodes.nodes() {
            let mut steps = 0;
            let mut current = node.parent_id.as_ref();
            while let Some(parent_id) = current {
                steps += 1;
                if steps > limit {
                    return Err(Error::integrity(format!(
                        "cycle detected above node {}",
                        node.id
                    )));
                }
                current = self
                    .nodes
                    .get_node(parent_id)
                    .and_then(|p| p.parent_id.as_ref());
            }
        }

        Ok(())
    }
}

/// Statistics about the memory graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryGraphStats {
    /// Total number of memory nodes.
    pub node_count: usize,

    /// Total number of ghost branches.
    pub ghost_count: usize,

    /// Number of roots (trees in the forest).
    pub root_count: usize,

    /// Nodes with no children.
    pub leaf_count: usize,

    /// Longest root-to-leaf edge count.
    pub max_depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decay::NoDecay;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn graph() -> TopologicalMemoryGraph {
        TopologicalMemoryGraph::with_decay(Arc::new(NoDecay))
    }

    fn ids(nodes: &[&MemoryNode]) -> Vec<MemoryNodeId> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_insert_root_and_child() {
        let mut g = graph();
        let root = g.insert_node("Build API", 0.9, None).unwrap();
        let child = g.insert_node("Use Axum", 0.8, Some(&root.id)).unwrap();

        assert!(root.is_root());
        assert_eq!(child.parent_id, Some(root.id.clone()));
        assert_eq!(g.get_node(&root.id).unwrap().children_ids, vec![child.id.clone()]);
        assert_eq!(g.node_count(), 2);
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_insert_with_unknown_parent_fails() {
        let mut g = graph();
        g.insert_node("Existing", 0.5, None).unwrap();

        let err = g
            .insert_node("Orphan", 0.5, Some(&MemoryNodeId::new()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParent(_)));
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_insert_rejects_nan_confidence() {
        let mut g = graph();
        let err = g.insert_node("Bad", f64::NAN, None).unwrap_err();
        assert!(matches!(err, Error::InvalidConfidence(_)));
        assert_eq!(g.node_count(), 0);

        let clamped = g.insert_node("Sure", 3.0, None).unwrap();
        assert_eq!(clamped.confidence, 1.0);
    }

    #[test]
    fn test_record_ghost() {
        let mut g = graph();
        let node = g.insert_node("Use JWT", 0.9, None).unwrap();
        let ghost = g
            .record_ghost("Use session cookies", "Needs sticky sessions", &node.id)
            .unwrap();

        assert_eq!(ghost.origin_node_id, node.id);
        assert_eq!(g.get_node(&node.id).unwrap().ghost_branch_ids, vec![ghost.id.clone()]);
        assert_eq!(g.ghosts_of(&node.id).len(), 1);
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_record_ghost_validation() {
        let mut g = graph();
        let node = g.insert_node("Use JWT", 0.9, None).unwrap();

        let err = g
            .record_ghost("Alt", "Too slow", &MemoryNodeId::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOrigin { .. }));

        let err = g.record_ghost("Alt", "   ", &node.id).unwrap_err();
        assert!(matches!(err, Error::InvalidOrigin { ref message, .. } if message.contains("empty")));

        assert_eq!(g.ghost_count(), 0);
        assert!(g.get_node(&node.id).unwrap().ghost_branch_ids.is_empty());
    }

    #[test]
    fn test_delete_reparents_children_to_grandparent() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let b = g.insert_node("B", 0.9, Some(&a.id)).unwrap();
        let c = g.insert_node("C", 0.9, Some(&b.id)).unwrap();
        let d = g.insert_node("D", 0.9, Some(&b.id)).unwrap();

        g.delete_node(&b.id).unwrap();

        assert!(g.get_node(&b.id).is_none());
        assert_eq!(g.get_node(&c.id).unwrap().parent_id, Some(a.id.clone()));
        assert_eq!(g.get_node(&d.id).unwrap().parent_id, Some(a.id.clone()));
        assert_eq!(
            g.get_node(&a.id).unwrap().children_ids,
            vec![c.id.clone(), d.id.clone()]
        );
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_reparented_children_keep_sibling_position() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let first = g.insert_node("first", 0.9, Some(&a.id)).unwrap();
        let b = g.insert_node("B", 0.9, Some(&a.id)).unwrap();
        let last = g.insert_node("last", 0.9, Some(&a.id)).unwrap();
        let c = g.insert_node("C", 0.9, Some(&b.id)).unwrap();
        let d = g.insert_node("D", 0.9, Some(&b.id)).unwrap();

        g.delete_node(&b.id).unwrap();

        assert_eq!(
            g.get_node(&a.id).unwrap().children_ids,
            vec![first.id, c.id, d.id, last.id]
        );
    }

    #[test]
    fn test_delete_root_promotes_children() {
        let mut g = graph();
        let root = g.insert_node("Root", 0.9, None).unwrap();
        let c1 = g.insert_node("C1", 0.9, Some(&root.id)).unwrap();
        let c2 = g.insert_node("C2", 0.9, Some(&root.id)).unwrap();

        g.delete_node(&root.id).unwrap();

        let mut roots = ids(&g.roots());
        roots.sort();
        let mut expected = vec![c1.id, c2.id];
        expected.sort();
        assert_eq!(roots, expected);
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_delete_missing_node() {
        let mut g = graph();
        let err = g.delete_node(&MemoryNodeId::new()).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_delete_cascades_only_own_ghosts() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let b = g.insert_node("B", 0.9, None).unwrap();
        let ga1 = g.record_ghost("A-alt-1", "weaker", &a.id).unwrap();
        let ga2 = g.record_ghost("A-alt-2", "slower", &a.id).unwrap();
        let gb = g.record_ghost("B-alt", "costlier", &b.id).unwrap();

        g.delete_node(&a.id).unwrap();

        assert!(g.get_ghost(&ga1.id).is_none());
        assert!(g.get_ghost(&ga2.id).is_none());
        assert!(g.get_ghost(&gb.id).is_some());
        assert_eq!(g.ghost_count(), 1);
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_prune_threshold_is_strict() {
        let mut g = graph();
        let low = g.insert_node("low", 0.2, None).unwrap();
        let exact = g.insert_node("exact", 0.5, None).unwrap();
        let high = g.insert_node("high", 0.9, None).unwrap();

        let removed = g.prune_memory(0.5);

        assert_eq!(removed, 1);
        assert!(g.get_node(&low.id).is_none());
        assert!(g.get_node(&exact.id).is_some());
        assert!(g.get_node(&high.id).is_some());
    }

    #[test]
    fn test_prune_is_idempotent_without_elapsed_time() {
        let mut g = TopologicalMemoryGraph::with_decay(Arc::new(ExponentialDecay::new(0.5)));
        for (i, conf) in [0.1, 0.3, 0.6, 0.8, 0.95].iter().enumerate() {
            g.insert_node(format!("n{}", i), *conf, None).unwrap();
        }
        let now = Utc::now() + Duration::days(1);

        let first = g.prune_memory_at(0.35, now);
        let second = g.prune_memory_at(0.35, now);

        // After one day at 0.5 retention: 0.05, 0.15, 0.3, 0.4, 0.475
        assert_eq!(first, 3);
        assert_eq!(second, 0);
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_prune_uses_effective_confidence() {
        let mut g = TopologicalMemoryGraph::with_decay(Arc::new(ExponentialDecay::new(0.5)));
        let node = g.insert_node("aging", 0.8, None).unwrap();

        // Fresh: 0.8 survives a 0.5 threshold.
        assert_eq!(g.prune_memory_at(0.5, node.timestamp), 0);

        // Two days later: 0.8 * 0.25 = 0.2.
        let later = node.timestamp + Duration::days(2);
        let effective = g.effective_confidence(&node.id, later).unwrap();
        assert!((effective - 0.2).abs() < 1e-9);
        assert_eq!(g.prune_memory_at(0.5, later), 1);
    }

    #[test]
    fn test_prune_does_not_protect_parents_and_keeps_descendants() {
        let mut g = graph();
        let strong_root = g.insert_node("root", 0.9, None).unwrap();
        let weak = g.insert_node("weak middle", 0.1, Some(&strong_root.id)).unwrap();
        let strong_leaf = g.insert_node("leaf", 0.9, Some(&weak.id)).unwrap();
        let ghost = g.record_ghost("alt", "worse", &weak.id).unwrap();

        assert_eq!(g.prune_memory(0.5), 1);

        assert!(g.get_node(&weak.id).is_none());
        assert!(g.get_ghost(&ghost.id).is_none());
        assert_eq!(
            g.get_node(&strong_leaf.id).unwrap().parent_id,
            Some(strong_root.id.clone())
        );
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_prune_chain_of_weak_nodes() {
        let mut g = graph();
        let a = g.insert_node("a", 0.1, None).unwrap();
        let b = g.insert_node("b", 0.1, Some(&a.id)).unwrap();
        let c = g.insert_node("c", 0.9, Some(&b.id)).unwrap();

        assert_eq!(g.prune_memory(0.5), 2);
        assert!(g.get_node(&c.id).unwrap().is_root());
        g.verify_integrity().unwrap();
    }

    #[test]
    fn test_prune_nan_threshold_removes_nothing() {
        let mut g = graph();
        g.insert_node("a", 0.0, None).unwrap();
        assert_eq!(g.prune_memory(f64::NAN), 0);
    }

    #[test]
    fn test_reassign_confidence() {
        let mut g = graph();
        let node = g.insert_node("a", 0.3, None).unwrap();

        g.reassign_confidence(&node.id, 0.7).unwrap();
        assert_eq!(g.get_node(&node.id).unwrap().confidence, 0.7);

        assert!(matches!(
            g.reassign_confidence(&MemoryNodeId::new(), 0.5),
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            g.reassign_confidence(&node.id, f64::INFINITY),
            Err(Error::InvalidConfidence(_))
        ));
    }

    #[test]
    fn test_path_and_descendants() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let b = g.insert_node("B", 0.9, Some(&a.id)).unwrap();
        let c = g.insert_node("C", 0.9, Some(&b.id)).unwrap();
        let d = g.insert_node("D", 0.9, Some(&a.id)).unwrap();

        assert_eq!(
            ids(&g.path_to_root(&c.id)),
            vec![a.id.clone(), b.id.clone(), c.id.clone()]
        );
        assert_eq!(ids(&g.descendants(&a.id)), vec![b.id, c.id, d.id]);
        assert!(g.path_to_root(&MemoryNodeId::new()).is_empty());
    }

    #[test]
    fn test_get_all_nodes_ordered_by_id() {
        let mut g = graph();
        for i in 0..5 {
            g.insert_node(format!("n{}", i), 0.5, None).unwrap();
        }

        let all = g.get_all_nodes();
        let mut sorted = all.iter().map(|n| n.id.clone()).collect::<Vec<_>>();
        sorted.sort();
        assert_eq!(all.iter().map(|n| n.id.clone()).collect::<Vec<_>>(), sorted);
    }

    #[test]
    fn test_stats() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let b = g.insert_node("B", 0.9, Some(&a.id)).unwrap();
        g.insert_node("C", 0.9, Some(&b.id)).unwrap();
        g.insert_node("D", 0.9, None).unwrap();
        g.record_ghost("alt", "no", &a.id).unwrap();

        let stats = g.stats();
        assert_eq!(
            stats,
            MemoryGraphStats {
                node_count: 4,
                ghost_count: 1,
                root_count: 2,
                leaf_count: 2,
                max_depth: 2,
            }
        );
    }

    #[test]
    fn test_snapshot_restore() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        g.insert_node("B", 0.4, Some(&a.id)).unwrap();
        g.record_ghost("alt", "no", &a.id).unwrap();

        let restored =
            TopologicalMemoryGraph::from_snapshot(g.snapshot(), Arc::new(NoDecay)).unwrap();
        assert_eq!(restored.get_all_nodes(), g.get_all_nodes());
        assert_eq!(restored.get_all_ghost_branches(), g.get_all_ghost_branches());
    }

    #[test]
    fn test_restore_rejects_dangling_parent() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        g.insert_node("B", 0.4, Some(&a.id)).unwrap();

        let mut snapshot = g.snapshot();
        snapshot.nodes.retain(|n| n.id != a.id);

        let err = TopologicalMemoryGraph::from_snapshot(snapshot, Arc::new(NoDecay)).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
    }

    #[test]
    fn test_restore_rejects_cycle() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let b = g.insert_node("B", 0.4, Some(&a.id)).unwrap();

        let mut snapshot = g.snapshot();
        for node in &mut snapshot.nodes {
            if node.id == a.id {
                node.parent_id = Some(b.id.clone());
            }
            if node.id == b.id {
                node.children_ids.push(a.id.clone());
            }
        }

        let err = TopologicalMemoryGraph::from_snapshot(snapshot, Arc::new(NoDecay)).unwrap_err();
        assert!(matches!(err, Error::Integrity(ref m) if m.contains("cycle")));
    }

    #[test]
    fn test_restore_rejects_invalid_confidence() {
        let mut g = graph();
        g.insert_node("A", 0.9, None).unwrap();

        for bad in [f64::NAN, f64::INFINITY, 1.5, -0.2] {
            let mut snapshot = g.snapshot();
            snapshot.nodes[0].confidence = bad;
            let err =
                TopologicalMemoryGraph::from_snapshot(snapshot, Arc::new(NoDecay)).unwrap_err();
            assert!(matches!(err, Error::Integrity(ref m) if m.contains("confidence")));
        }
    }

    #[test]
    fn test_restore_rejects_ghost_listed_twice() {
        let mut g = graph();
        let a = g.insert_node("A", 0.9, None).unwrap();
        let ghost = g.record_ghost("alt", "weaker", &a.id).unwrap();

        let mut snapshot = g.snapshot();
        snapshot.nodes[0].ghost_branch_ids.push(ghost.id.clone());

        let err = TopologicalMemoryGraph::from_snapshot(snapshot, Arc::new(NoDecay)).unwrap_err();
        assert!(matches!(err, Error::Integrity(ref m) if m.contains("twice")));
    }

    #[test]
    fn test_stats_on_deep_chain() {
        let mut g = graph();
        let mut parent = g.insert_node("step 0", 0.5, None).unwrap().id;
        for i in 1..=200_000 {
            parent = g
                .insert_node(format!("step {}", i), 0.5, Some(&parent))
                .unwrap()
                .id;
        }

        let stats = g.stats();
        assert_eq!(stats.max_depth, 200_000);
        assert_eq!(stats.root_count, 1);
        assert_eq!(stats.leaf_count, 1);
    }
}
