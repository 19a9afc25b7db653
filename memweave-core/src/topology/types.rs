//! Entities of the topological memory graph.

use crate::error::{Error, Result};
use crate::store::Keyed;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a memory node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemoryNodeId(pub Uuid);

impl MemoryNodeId {
    /// Generate a new random node ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from a UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from string.
    pub fn parse(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for MemoryNodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MemoryNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a ghost branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GhostId(pub Uuid);

impl GhostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse(s: &str) -> std::result::Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for GhostId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GhostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A remembered, confidence-scored conclusion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryNode {
    /// Unique identifier for this node.
    pub id: MemoryNodeId,

    /// Text of the conclusion.
    pub content: String,

    /// Stored confidence score (0.0 - 1.0).
    pub confidence: f64,

    /// When this conclusion was recorded.
    pub timestamp: DateTime<Utc>,

    /// The node this conclusion was derived from. `None` for roots.
    pub parent_id: Option<MemoryNodeId>,

    /// Nodes derived from this one, in derivation order.
    #[serde(default)]
    pub children_ids: Vec<MemoryNodeId>,

    /// Rejected alternatives considered at this point.
    #[serde(default)]
    pub ghost_branch_ids: Vec<GhostId>,
}

impl MemoryNode {
    pub(crate) fn new(
        content: impl Into<String>,
        confidence: f64,
        parent_id: Option<MemoryNodeId>,
    ) -> Self {
        Self {
            id: MemoryNodeId::new(),
            content: content.into(),
            confidence,
            timestamp: Utc::now(),
            parent_id,
            children_ids: Vec::new(),
            ghost_branch_ids: Vec::new(),
        }
    }

    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether nothing has been derived from this node.
    pub fn is_leaf(&self) -> bool {
        self.children_ids.is_empty()
    }
}

impl Keyed for MemoryNode {
    type Key = MemoryNodeId;

    fn key(&self) -> &MemoryNodeId {
        &self.id
    }
}

/// An alternative conclusion that was considered but not adopted.
///
/// Ghosts are leaves kept for auditability. They never have children and
/// disappear only together with their origin node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GhostBranch {
    /// Unique identifier for this ghost.
    pub id: GhostId,

    /// Text of the rejected conclusion.
    pub content: String,

    /// When the alternative was rejected.
    pub timestamp: DateTime<Utc>,

    /// Why the alternative lost.
    pub reason_for_rejection: String,

    /// The memory node this alternative branched from.
    pub origin_node_id: MemoryNodeId,
}

impl GhostBranch {
    pub(crate) fn new(
        content: impl Into<String>,
        reason_for_rejection: impl Into<String>,
        origin_node_id: MemoryNodeId,
    ) -> Self {
        Self {
            id: GhostId::new(),
            content: content.into(),
            timestamp: Utc::now(),
            reason_for_rejection: reason_for_rejection.into(),
            origin_node_id,
        }
    }
}

impl Keyed for GhostBranch {
    type Key = GhostId;

    fn key(&self) -> &GhostId {
        &self.id
    }
}

/// Reject non-finite confidence and clamp the rest into [0, 1].
pub(crate) fn checked_confidence(confidence: f64) -> Result<f64> {
    if !confidence.is_finite() {
        return Err(Error::InvalidConfidence(confidence));
    }
    Ok(confidence.clamp(0.0, 1.0))
}
