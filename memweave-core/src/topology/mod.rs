//! Topological memory graph of reasoned conclusions.
//!
//! Conclusions produced by upstream reasoning are kept as a forest: each
//! [`MemoryNode`] may name the node it was derived from. Alternatives that
//! were considered and rejected are kept as [`GhostBranch`] leaves on the node
//! that won, so the graph can explain what was *not* concluded and why.
//!
//! ## Example
//!
//! ```rust,ignore
//! use memweave_core::topology::TopologicalMemoryGraph;
//!
//! let mut graph = TopologicalMemoryGraph::new();
//!
//! let goal = graph.insert_node("User wants stateless auth", 0.9, None)?;
//! let choice = graph.insert_node("Use JWT tokens", 0.8, Some(&goal.id))?;
//! graph.record_ghost("Use session cookies", "Requires sticky sessions", &choice.id)?;
//!
//! // Later: forget whatever has decayed below 0.3
//! let removed = graph.prune_memory(0.3);
//! ```

mod graph;
mod types;

pub use graph::{MemoryGraphStats, TopologicalMemoryGraph};
pub use types::{GhostBranch, GhostId, MemoryNode, MemoryNodeId};
