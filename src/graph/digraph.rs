// src/graph/digraph.rs
// =============================================================================
// The domain graph that crawl tasks write into concurrently.
//
// Layout:
// - Digraph: domain string -> Arc<Vertex> in a sharded DashMap. Inserting a
//   new domain goes through entry(), so check-and-insert is one atomic step.
// - Vertex: its own parking_lot Mutex around the incoming/outgoing lists, so
//   two tasks editing different vertices never wait on each other.
//
// Edges point at domains (interned Arc<str>) rather than at other vertices.
// The lists are informational/traversal data, and storing names instead of
// Arc<Vertex> keeps the graph free of reference cycles.
//
// Nothing is ever removed. Once every crawl task has finished, the graph is
// effectively read-only and can be queried or dumped.
// =============================================================================

use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::{Mutex, MutexGuard};

// Adjacency lists of one vertex. Parallel duplicates are allowed.
#[derive(Debug, Default)]
struct Edges {
    incoming: Vec<Arc<str>>,
    outgoing: Vec<Arc<str>>,
}

// One registrable domain discovered during the crawl
#[derive(Debug)]
pub struct Vertex {
    element: Arc<str>,
    edges: Mutex<Edges>,
}

impl Vertex {
    pub fn new(element: impl Into<Arc<str>>) -> Self {
        Self {
            element: element.into(),
            edges: Mutex::new(Edges::default()),
        }
    }

    /// The domain this vertex stands for
    pub fn element(&self) -> &str {
        &self.element
    }

    pub(crate) fn element_arc(&self) -> Arc<str> {
        Arc::clone(&self.element)
    }

    /// Records that `source` linked to this vertex
    pub fn add_incoming(&self, source: &Vertex) {
        self.lock().incoming.push(source.element_arc());
    }

    /// Records that this vertex linked to `target`
    pub fn add_outgoing(&self, target: &Vertex) {
        self.lock().outgoing.push(target.element_arc());
    }

    pub fn incoming(&self) -> Vec<Arc<str>> {
        self.lock().incoming.clone()
    }

    pub fn outgoing(&self) -> Vec<Arc<str>> {
        self.lock().outgoing.clone()
    }

    pub fn in_degree(&self) -> usize {
        self.lock().incoming.len()
    }

    pub fn out_degree(&self) -> usize {
        self.lock().outgoing.len()
    }

    fn lock(&self) -> MutexGuard<'_, Edges> {
        self.edges.lock()
    }

    // `domain;in1,in2;out1,out2`
    pub(crate) fn dump_line(&self) -> String {
        let edges = self.lock();
        format!(
            "{};{};{}",
            self.element,
            edges.incoming.join(","),
            edges.outgoing.join(",")
        )
    }

    pub(crate) fn push_incoming_name(&self, name: Arc<str>) {
        self.lock().incoming.push(name);
    }

    pub(crate) fn push_outgoing_name(&self, name: Arc<str>) {
        self.lock().outgoing.push(name);
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges = self.lock();
        write!(
            f,
            "element: {}, in-degree: {}, out-degree: {}",
            self.element,
            edges.incoming.len(),
            edges.outgoing.len()
        )
    }
}

// Directed graph of domains, safe to share between crawl tasks
#[derive(Debug, Default)]
pub struct Digraph {
    vertices: DashMap<Arc<str>, Arc<Vertex>>,
}

impl Digraph {
    pub fn new() -> Self {
        Self::default()
    }

    // Inserts a vertex keyed by its element.
    // An existing vertex with the same key is replaced; callers that need
    // "insert only if new" should use get_or_insert instead.
    pub fn add_vertex(&self, vertex: Arc<Vertex>) {
        self.vertices.insert(vertex.element_arc(), vertex);
    }

    pub fn lookup(&self, domain: &str) -> Option<Arc<Vertex>> {
        self.vertices.get(domain).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.lookup(domain).is_some()
    }

    // Returns the vertex for `domain`, creating it if needed.
    // The entry holds its shard locked from check to insert, so of several
    // tasks racing on the same new domain exactly one sees `true`.
    pub fn get_or_insert(&self, domain: &str) -> (Arc<Vertex>, bool) {
        if let Some(existing) = self.lookup(domain) {
            return (existing, false);
        }

        match self.vertices.entry(Arc::from(domain)) {
            Entry::Occupied(occupied) => (Arc::clone(occupied.get()), false),
            Entry::Vacant(vacant) => {
                let vertex = Arc::new(Vertex::new(vacant.key().clone()));
                vacant.insert(Arc::clone(&vertex));
                (vertex, true)
            }
        }
    }

    /// Number of vertices
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total out-degree, i.e. number of recorded forward edges (duplicates included)
    pub fn edge_count(&self) -> usize {
        self.snapshot().iter().map(|v| v.out_degree()).sum()
    }

    /// All domains currently in the graph, in no particular order
    pub fn domains(&self) -> Vec<String> {
        self.snapshot().iter().map(|v| v.element().to_string()).collect()
    }

    // Copies the vertex handles out so per-vertex locks are never taken
    // while a shard lock is held.
    pub(crate) fn snapshot(&self) -> Vec<Arc<Vertex>> {
        self.vertices
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }
}

impl fmt::Display for Digraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "number of nodes: {}, number of edges: {}",
            self.len(),
            self.edge_count()
        )
    }
}
