// src/graph/query.rs
// =============================================================================
// Shortest domain-to-domain path over a finished graph.
//
// Plain breadth-first search along outgoing edges. The first time a domain is
// reached we remember who reached it; since BFS visits vertices in order of
// hop count, that first parent lies on a shortest path. Walking the parent
// links back from the destination and reversing gives the path.
//
// When several shortest paths exist, which one comes back depends on edge
// insertion order. Only the length is guaranteed to be minimal.
// =============================================================================

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::error::PathError;

use super::digraph::Digraph;

// Ordered domains from source to destination, both included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DomainPath(Vec<String>);

impl DomainPath {
    pub fn domains(&self) -> &[String] {
        &self.0
    }

    /// Number of edges walked (one less than the number of domains)
    pub fn hops(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl fmt::Display for DomainPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" -> "))
    }
}

// Finds a path with the fewest hops from `src` to `dst`
//
// Errors:
//   UnknownSource - `src` is not in the graph
//   NotReachable  - `dst` is missing or no directed path leads to it
pub fn shortest_path(graph: &Digraph, src: &str, dst: &str) -> Result<DomainPath, PathError> {
    let start = graph
        .lookup(src)
        .ok_or_else(|| PathError::UnknownSource(src.to_string()))?;

    if src == dst {
        return Ok(DomainPath(vec![src.to_string()]));
    }

    let not_reachable = || PathError::NotReachable {
        src: src.to_string(),
        dst: dst.to_string(),
    };
    if !graph.contains(dst) {
        return Err(not_reachable());
    }

    // child -> parent, filled the first time the child is reached.
    // The source is its own marker so it counts as visited.
    let start_name = start.element_arc();
    let mut parents: HashMap<Arc<str>, Option<Arc<str>>> = HashMap::new();
    parents.insert(Arc::clone(&start_name), None);

    let mut queue = VecDeque::from([start_name]);
    let mut found = false;

    'search: while let Some(current) = queue.pop_front() {
        let Some(vertex) = graph.lookup(&current) else {
            continue;
        };

        for next in vertex.outgoing() {
            if parents.contains_key(&next) {
                continue;
            }
            parents.insert(Arc::clone(&next), Some(Arc::clone(&current)));

            if &*next == dst {
                found = true;
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if !found {
        return Err(not_reachable());
    }

    let mut path = vec![dst.to_string()];
    let mut cursor: Option<Arc<str>> = parents.get(dst).cloned().flatten();
    while let Some(step) = cursor {
        path.push(step.to_string());
        cursor = parents.get(&step).cloned().flatten();
    }
    path.reverse();

    Ok(DomainPath(path))
}
