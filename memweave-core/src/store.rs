//! Generic in-memory node/edge container shared by both graphs.
//!
//! `GraphStore` keeps nodes in an ordered map keyed by their id and edges in
//! an insertion-ordered list. It enforces id uniqueness and nothing else:
//! referential rules (parents, origins, endpoints) belong to the graph that
//! owns the store.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

/// A value that carries its own identity.
pub trait Keyed {
    /// Identifier type. Ordering defines the stable listing order.
    type Key: Ord + Clone + Debug + Display;

    /// The id of this value.
    fn key(&self) -> &Self::Key;
}

/// Mapping-backed node/edge container with lookup by id.
#[derive(Debug, Clone)]
pub struct GraphStore<N: Keyed, E = ()> {
    nodes: BTreeMap<N::Key, N>,
    edges: Vec<E>,
}

impl<N: Keyed, E> Default for GraphStore<N, E> {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges: Vec::new(),
        }
    }
}

impl<N: Keyed, E> GraphStore<N, E> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously captured parts.
    ///
    /// Fails with `DuplicateId` if two nodes share an id.
    pub fn from_parts(nodes: impl IntoIterator<Item = N>, edges: Vec<E>) -> Result<Self> {
        let mut store = Self::new();
        for node in nodes {
            store.insert_node(node)?;
        }
        store.edges = edges;
        Ok(store)
    }

    // ==================== Node Operations ====================

    /// Insert a node, rejecting an id that is already present.
    pub fn insert_node(&mut self, node: N) -> Result<()> {
        if self.nodes.contains_key(node.key()) {
            return Err(Error::DuplicateId(node.key().to_string()));
        }
        self.nodes.insert(node.key().clone(), node);
        Ok(())
    }

    /// Get a node by id.
    pub fn get_node(&self, id: &N::Key) -> Option<&N> {
        self.nodes.get(id)
    }

    /// Get a mutable node by id.
    pub(crate) fn get_node_mut(&mut self, id: &N::Key) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    /// Check whether a node exists.
    pub fn contains_node(&self, id: &N::Key) -> bool {
        self.nodes.contains_key(id)
    }

    /// Remove a node, returning it if it was present.
    pub(crate) fn remove_node(&mut self, id: &N::Key) -> Option<N> {
        self.nodes.remove(id)
    }

    /// Iterate over nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.values()
    }

    /// Iterate over node ids in order.
    pub fn node_ids(&self) -> impl Iterator<Item = &N::Key> {
        self.nodes.keys()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ==================== Edge Operations ====================

    /// Append an edge, returning its index. Endpoint validation is the
    /// caller's responsibility.
    pub(crate) fn push_edge(&mut self, edge: E) -> usize {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> &[E] {
        &self.edges
    }

    /// Edge at `index`, mutably. Edges are never removed, so indices stay valid.
    pub(crate) fn edge_mut(&mut self, index: usize) -> Option<&mut E> {
        self.edges.get_mut(index)
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    impl Keyed for Item {
        type Key = u32;

        fn key(&self) -> &u32 {
            &self.id
        }
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut store: GraphStore<Item> = GraphStore::new();
        store.insert_node(Item { id: 2, name: "b" }).unwrap();
        store.insert_node(Item { id: 1, name: "a" }).unwrap();

        assert_eq!(store.node_count(), 2);
        assert_eq!(store.get_node(&1).unwrap().name, "a");
        assert!(store.contains_node(&2));
        assert!(store.get_node(&3).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store: GraphStore<Item> = GraphStore::new();
        store.insert_node(Item { id: 1, name: "a" }).unwrap();

        let err = store.insert_node(Item { id: 1, name: "other" }).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(ref id) if id == "1"));
        assert_eq!(store.get_node(&1).unwrap().name, "a");
    }

    #[test]
    fn test_nodes_iterate_in_id_order() {
        let mut store: GraphStore<Item> = GraphStore::new();
        for id in [5, 1, 3] {
            store.insert_node(Item { id, name: "n" }).unwrap();
        }

        let ids: Vec<u32> = store.node_ids().copied().collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_edges_keep_insertion_order() {
        let mut store: GraphStore<Item, (u32, u32)> = GraphStore::new();
        store.push_edge((3, 1));
        store.push_edge((1, 2));
        let last = store.push_edge((2, 3));
        assert_eq!(last, 2);

        assert_eq!(store.edges(), &[(3, 1), (1, 2), (2, 3)]);

        assert_eq!(store.edge_count(), 3);

        if let Some(edge) = store.edge_mut(last) {
            edge.1 = 9;
        }
        assert_eq!(store.edges()[2], (2, 9));
        assert!(store.edge_mut(3).is_none());
    }

    #[test]
    fn test_from_parts_rejects_duplicates() {
        let nodes = vec![Item { id: 1, name: "a" }, Item { id: 1, name: "b" }];
        let result: Result<GraphStore<Item>> = GraphStore::from_parts(nodes, Vec::new());
        assert!(matches!(result, Err(Error::DuplicateId(_))));
    }

    #[test]
    fn test_remove_node() {
        let mut store: GraphStore<Item> = GraphStore::new();
        store.insert_node(Item { id: 1, name: "a" }).unwrap();

        assert_eq!(store.remove_node(&1), Some(Item { id: 1, name: "a" }));
        assert!(store.is_empty());
        assert!(store.remove_node(&1).is_none());
    }
}
