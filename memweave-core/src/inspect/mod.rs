//! Read-only views for user interfaces.
//!
//! Everything here works on borrowed graphs and hands back owned copies or
//! rendered text, so nothing a caller does with the result can reach back
//! into the graph.
//!
//! - [`MemoryQuery`] / [`ConceptQuery`]: filtered, sorted listings
//! - [`telemetry`]: decayed strength per node
//! - [`memory_mermaid`], [`lattice_mermaid`], [`memory_dot`]: diagrams

mod query;
mod telemetry;
mod visualize;

pub use query::{ghosts_newest_first, ConceptQuery, MemoryQuery, SortOrder};
pub use telemetry::{telemetry, MemoryTelemetry};
pub use visualize::{lattice_mermaid, memory_dot, memory_mermaid, DotConfig};
