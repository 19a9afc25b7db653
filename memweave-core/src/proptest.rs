//! Property-based tests for graph invariants using proptest.
//!
//! - The memory graph stays a well-formed forest under any sequence of
//!   inserts, ghosts, deletes and prunes
//! - Decay never raises confidence and never increases with age
//! - Tag ingestion keeps one concept per label and only strengthens edges
