//! Graph abstraction used by the propagation engine, and a simple adjacency-list implementation.

pub type VertexId = usize;
pub type EdgeId = usize;

/// Read-only view of a directed multigraph, as needed by belief propagation.
///
/// Edge and vertex indices must be dense (in `0..num_edges()` and `0..num_vertices()`) and unique:
/// they are used as keys of [`crate::EdgeMap`], [`crate::VertexMap`] and of the resolution state.
pub trait BpGraph {
    type Vertex: Copy + Eq + std::fmt::Debug;
    type Edge: Copy + Eq + std::fmt::Debug;

    fn num_vertices(&self) -> usize;
    fn num_edges(&self) -> usize;
    fn vertices(&self) -> impl Iterator<Item = Self::Vertex> + '_;
    fn edges(&self) -> impl Iterator<Item = Self::Edge> + '_;
    fn in_edges(&self, vertex: Self::Vertex) -> impl Iterator<Item = Self::Edge> + '_;
    fn out_edges(&self, vertex: Self::Vertex) -> impl Iterator<Item = Self::Edge> + '_;
    fn source(&self, edge: Self::Edge) -> Self::Vertex;
    fn target(&self, edge: Self::Edge) -> Self::Vertex;
    fn edge_index(&self, edge: Self::Edge) -> usize;
    fn vertex_index(&self, vertex: Self::Vertex) -> usize;
}

#[derive(Debug, Clone, Default)]
struct Vertex {
    in_edges: Vec<EdgeId>,
    out_edges: Vec<EdgeId>,
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    source: VertexId,
    target: VertexId,
}

/// Directed multigraph stored as adjacency lists.
///
/// Vertices and edges are numbered in insertion order, hence their ids are also their indices.
#[derive(Debug, Clone, Default)]
pub struct DiGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl DiGraph {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_vertices(n: usize) -> Self {
        Self {
            vertices: vec![Vertex::default(); n],
            edges: Vec::new(),
        }
    }
    /// Build a graph with `n` vertices and the given directed edges.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (VertexId, VertexId)>) -> Self {
        let mut graph = Self::with_vertices(n);
        for (source, target) in edges {
            graph.add_edge(source, target);
        }
        graph
    }
    pub fn add_vertex(&mut self) -> VertexId {
        self.vertices.push(Vertex::default());
        self.vertices.len() - 1
    }
    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> EdgeId {
        assert!(source < self.vertices.len(), "Source vertex out of bounds.");
        assert!(target < self.vertices.len(), "Target vertex out of bounds.");
        let edge_id = self.edges.len();
        self.edges.push(Edge { source, target });
        self.vertices[source].out_edges.push(edge_id);
        self.vertices[target].in_edges.push(edge_id);
        edge_id
    }
    /// Add the two edges `u -> v` and `v -> u` that model one undirected connection.
    pub fn add_reciprocal_edge(&mut self, u: VertexId, v: VertexId) -> (EdgeId, EdgeId) {
        (self.add_edge(u, v), self.add_edge(v, u))
    }
    /// First edge going from the target of `edge` back to its source, if any.
    pub fn reverse_edge(&self, edge: EdgeId) -> Option<EdgeId> {
        let Edge { source, target } = self.edges[edge];
        self.vertices[target]
            .out_edges
            .iter()
            .copied()
            .find(|e| self.edges[*e].target == source)
    }
    pub fn find_edge(&self, source: VertexId, target: VertexId) -> Option<EdgeId> {
        self.vertices[source]
            .out_edges
            .iter()
            .copied()
            .find(|e| self.edges[*e].target == target)
    }
    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.vertices[vertex].in_edges.len()
    }
}

impl BpGraph for DiGraph {
    type Vertex = VertexId;
    type Edge = EdgeId;

    fn num_vertices(&self) -> usize {
        self.vertices.len()
    }
    fn num_edges(&self) -> usize {
        self.edges.len()
    }
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        0..self.vertices.len()
    }
    fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        0..self.edges.len()
    }
    fn in_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices[vertex].in_edges.iter().copied()
    }
    fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices[vertex].out_edges.iter().copied()
    }
    fn source(&self, edge: EdgeId) -> VertexId {
        self.edges[edge].source
    }
    fn target(&self, edge: EdgeId) -> VertexId {
        self.edges[edge].target
    }
    fn edge_index(&self, edge: EdgeId) -> usize {
        edge
    }
    fn vertex_index(&self, vertex: VertexId) -> usize {
        vertex
    }
}
