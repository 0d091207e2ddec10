// src/graph/mod.rs
// =============================================================================
// The domain graph and what can be done with it once the crawl is over.
//
// Submodules:
// - digraph: Vertex and Digraph, safe for many concurrent writers
// - dump: text adjacency dump (write, append, read back)
// - query: breadth-first shortest path between two domains
// =============================================================================

mod digraph;
mod dump;
mod query;

pub use digraph::{Digraph, Vertex};
pub use query::{shortest_path, DomainPath};
