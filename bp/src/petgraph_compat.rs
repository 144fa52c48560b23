//! [`BpGraph`] for petgraph's directed graphs.
//!
//! Node and edge indices of a `petgraph::Graph` are dense as long as nothing has been removed
//! from the graph, which is required for propagation.

use petgraph::graph::{EdgeIndex, Graph, IndexType, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::{Directed, Direction};

use crate::graph::BpGraph;

impl<N, E, Ix: IndexType> BpGraph for Graph<N, E, Directed, Ix> {
    type Vertex = NodeIndex<Ix>;
    type Edge = EdgeIndex<Ix>;

    fn num_vertices(&self) -> usize {
        self.node_count()
    }
    fn num_edges(&self) -> usize {
        self.edge_count()
    }
    fn vertices(&self) -> impl Iterator<Item = NodeIndex<Ix>> + '_ {
        self.node_indices()
    }
    fn edges(&self) -> impl Iterator<Item = EdgeIndex<Ix>> + '_ {
        self.edge_indices()
    }
    fn in_edges(&self, vertex: NodeIndex<Ix>) -> impl Iterator<Item = EdgeIndex<Ix>> + '_ {
        self.edges_directed(vertex, Direction::Incoming)
            .map(|e| e.id())
    }
    fn out_edges(&self, vertex: NodeIndex<Ix>) -> impl Iterator<Item = EdgeIndex<Ix>> + '_ {
        self.edges_directed(vertex, Direction::Outgoing)
            .map(|e| e.id())
    }
    fn source(&self, edge: EdgeIndex<Ix>) -> NodeIndex<Ix> {
        self.raw_edges()[edge.index()].source()
    }
    fn target(&self, edge: EdgeIndex<Ix>) -> NodeIndex<Ix> {
        self.raw_edges()[edge.index()].target()
    }
    fn edge_index(&self, edge: EdgeIndex<Ix>) -> usize {
        edge.index()
    }
    fn vertex_index(&self, vertex: NodeIndex<Ix>) -> usize {
        vertex.index()
    }
}
