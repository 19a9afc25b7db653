//! # memweave-core
//!
//! A dual-graph memory engine for conversational AI workspaces.
//!
//! ## Core Components
//!
//! - **Topology**: Forest of confidence-scored conclusions plus the ghost
//!   branches (rejected alternatives) recorded at each one
//! - **Lattice**: Concept graph built from extracted semantic tags, with
//!   activation paths and activated subgraphs
//! - **Decay**: Time-based effective confidence used when pruning
//! - **Inspect**: Read-only listings, telemetry and diagram exports
//! - **Engine**: Shareable service holding both graphs behind locks
//!
//! ## Example
//!
//! ```rust,ignore
//! use memweave_core::{EngineConfig, MemoryEngine};
//!
//! let engine = MemoryEngine::new(EngineConfig::default())?;
//!
//! let chosen = engine.insert_node("Store sessions in Redis", 0.8, None)?;
//! engine.record_ghost("Store sessions in cookies", "size limits", &chosen.id)?;
//!
//! engine.ingest_semantic_tags(&["sessions", "redis"])?;
//! let path = engine.find_activation_path("sessions", "redis")?;
//!
//! engine.prune_memory(0.2)?;
//! ```

pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod lattice;
mod proptest;
pub mod snapshot;
pub mod store;
pub mod topology;

// Re-exports for convenience
pub use config::{DecayConfig, EngineConfig, LatticeConfig};
pub use decay::{DecayPolicy, ExponentialDecay, NoDecay};
pub use engine::MemoryEngine;
pub use error::{Error, Result};
pub use inspect::{
    ghosts_newest_first, lattice_mermaid, memory_dot, memory_mermaid, telemetry, ConceptQuery,
    DotConfig, MemoryQuery, MemoryTelemetry, SortOrder,
};
pub use lattice::{
    ActivatedSubgraph, ActivationPath, ConceptId, ConceptKind, IngestReport, LatticeEdge,
    LatticeNode, LatticeStats, RelationType, SymbolicLattice,
};
pub use snapshot::{EngineSnapshot, LatticeSnapshot, MemorySnapshot};
pub use store::{GraphStore, Keyed};
pub use topology::{
    GhostBranch, GhostId, MemoryGraphStats, MemoryNode, MemoryNodeId, TopologicalMemoryGraph,
};
