use indexmap::IndexSet;

use super::GraphBuildError;
use crate::graph::{BpGraph, DiGraph, EdgeId, VertexId};

/// [`DiGraph`] whose vertices have unique names.
///
/// Vertex ids follow the declaration order of the names.
#[derive(Debug, Clone, Default)]
pub struct NamedGraph {
    graph: DiGraph,
    names: IndexSet<String>,
}

impl NamedGraph {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_vertex(&mut self, name: String) -> Result<VertexId, GraphBuildError> {
        if self.names.contains(&name) {
            return Err(GraphBuildError::MultipleVertexDecl(name));
        }
        self.names.insert(name);
        Ok(self.graph.add_vertex())
    }
    pub fn vertex(&self, name: &str) -> Option<VertexId> {
        self.names.get_index_of(name)
    }
    pub fn name(&self, vertex: VertexId) -> Option<&str> {
        self.names.get_index(vertex).map(|n| n.as_str())
    }
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_str())
    }
    fn lookup(&self, name: &str) -> Result<VertexId, GraphBuildError> {
        self.vertex(name)
            .ok_or_else(|| GraphBuildError::UnknownVertex(name.to_owned()))
    }
    fn endpoints(&self, from: &str, to: &str) -> Result<(VertexId, VertexId), GraphBuildError> {
        let (u, w) = (self.lookup(from)?, self.lookup(to)?);
        if u == w {
            return Err(GraphBuildError::SelfLoop(from.to_owned()));
        }
        Ok((u, w))
    }
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<EdgeId, GraphBuildError> {
        let (u, w) = self.endpoints(from, to)?;
        Ok(self.graph.add_edge(u, w))
    }
    pub fn add_reciprocal_edge(
        &mut self,
        from: &str,
        to: &str,
    ) -> Result<(EdgeId, EdgeId), GraphBuildError> {
        let (u, w) = self.endpoints(from, to)?;
        Ok(self.graph.add_reciprocal_edge(u, w))
    }
    /// Edge between two named vertices, if any.
    pub fn edge(&self, from: &str, to: &str) -> Option<EdgeId> {
        self.graph.find_edge(self.vertex(from)?, self.vertex(to)?)
    }
    pub fn graph(&self) -> &DiGraph {
        &self.graph
    }
}

impl BpGraph for NamedGraph {
    type Vertex = VertexId;
    type Edge = EdgeId;

    fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }
    fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.vertices()
    }
    fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.edges()
    }
    fn in_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.in_edges(vertex)
    }
    fn out_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph.out_edges(vertex)
    }
    fn source(&self, edge: EdgeId) -> VertexId {
        self.graph.source(edge)
    }
    fn target(&self, edge: EdgeId) -> VertexId {
        self.graph.target(edge)
    }
    fn edge_index(&self, edge: EdgeId) -> usize {
        edge
    }
    fn vertex_index(&self, vertex: VertexId) -> usize {
        vertex
    }
}
