//! Plain, serializable snapshots of both graphs.
//!
//! A snapshot is just the node and edge collections. Storage of the rendered
//! form is left to the caller; restoring re-validates every reference.

use crate::error::Result;
use crate::lattice::{LatticeEdge, LatticeNode};
use crate::topology::{GhostBranch, MemoryNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contents of a topological memory graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySnapshot {
    /// Memory nodes in id order.
    #[serde(default)]
    pub nodes: Vec<MemoryNode>,

    /// Ghost branches in id order.
    #[serde(default)]
    pub ghosts: Vec<GhostBranch>,
}

/// Contents of a symbolic lattice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatticeSnapshot {
    /// Concept nodes in insertion order.
    #[serde(default)]
    pub nodes: Vec<LatticeNode>,

    /// Relations in insertion order.
    #[serde(default)]
    pub edges: Vec<LatticeEdge>,
}

/// Both graphs of an engine, captured independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    /// When the snapshot was taken.
    pub captured_at: DateTime<Utc>,

    /// The memory graph.
    #[serde(default)]
    pub memory: MemorySnapshot,

    /// The symbolic lattice.
    #[serde(default)]
    pub lattice: LatticeSnapshot,
}

impl EngineSnapshot {
    /// Export as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON. References are checked on restore, not here.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
