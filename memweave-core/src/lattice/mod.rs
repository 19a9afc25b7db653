//! Symbolic lattice of extracted concepts.
//!
//! Upstream extraction turns conversation text into label strings. Each
//! ingestion batch maps labels onto concept nodes (one node per label) and
//! records that every pair of them appeared together by creating or
//! strengthening a `co_occurring` edge.
//!
//! ## Core Concepts
//!
//! - **LatticeNode**: A concept, keyed by its label during ingestion
//! - **LatticeEdge**: A typed, weighted relation between two concepts
//! - **ActivationPath**: Shortest hop-count route between two concepts
//! - **ActivatedSubgraph**: Named concepts plus the edges strictly among them
//!
//! ## Example
//!
//! ```rust,ignore
//! use memweave_core::lattice::SymbolicLattice;
//!
//! let mut lattice = SymbolicLattice::new();
//! lattice.ingest_semantic_tags(&["auth", "jwt"])?;
//! lattice.ingest_semantic_tags(&["jwt", "expiry"])?;
//!
//! let path = lattice.find_activation_path("auth", "expiry").unwrap();
//! assert_eq!(path.labels(), vec!["auth", "jwt", "expiry"]);
//! ```

mod graph;
mod query;
mod types;

pub use graph::{IngestReport, LatticeStats, SymbolicLattice};
pub use query::{ActivatedSubgraph, ActivationPath};
pub use types::{ConceptId, ConceptKind, LatticeEdge, LatticeNode, RelationType};
