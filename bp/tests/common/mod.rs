#![allow(dead_code)]

use std::collections::BTreeSet;

use bp::{BpGraph, DiGraph, EdgeMap, VertexMap, Visitor};

/// Visitor that records the calls made by the engine.
///
/// A message holds the set of vertices whose information reached it, a belief the set of
/// vertices whose information reached the vertex (including itself).
#[derive(Debug, Default)]
pub struct Recorder {
    /// (edge index, edge indices of the known in-edges), in call order
    pub messages: Vec<(usize, Vec<usize>)>,
    /// vertex indices, in call order
    pub beliefs: Vec<usize>,
    pub fail_on: Option<usize>,
}

impl Recorder {
    pub fn failing_on(edge_index: usize) -> Self {
        Self {
            fail_on: Some(edge_index),
            ..Default::default()
        }
    }
    pub fn known_of(&self, edge_index: usize) -> Option<&[usize]> {
        self.messages
            .iter()
            .find(|(e, _)| *e == edge_index)
            .map(|(_, known)| known.as_slice())
    }
}

impl<G: BpGraph> Visitor<G> for Recorder {
    type Message = BTreeSet<usize>;
    type Belief = BTreeSet<usize>;
    type Error = String;

    fn init_messages(
        &mut self,
        messages: &mut EdgeMap<BTreeSet<usize>>,
        _graph: &G,
    ) -> Result<(), String> {
        messages.iter_mut().for_each(|m| m.clear());
        Ok(())
    }

    fn init_beliefs(
        &mut self,
        beliefs: &mut VertexMap<BTreeSet<usize>>,
        _graph: &G,
    ) -> Result<(), String> {
        beliefs.iter_mut().for_each(|b| b.clear());
        Ok(())
    }

    fn make_message(
        &mut self,
        edge: G::Edge,
        known_in_edges: &[G::Edge],
        messages: &EdgeMap<BTreeSet<usize>>,
        graph: &G,
    ) -> Result<BTreeSet<usize>, String> {
        let edge_index = graph.edge_index(edge);
        if self.fail_on == Some(edge_index) {
            return Err(format!("cannot compute message {}", edge_index));
        }
        self.messages.push((
            edge_index,
            known_in_edges.iter().map(|e| graph.edge_index(*e)).collect(),
        ));
        let mut message: BTreeSet<usize> = known_in_edges
            .iter()
            .flat_map(|e| messages.at(graph, *e).iter().copied())
            .collect();
        message.insert(graph.vertex_index(graph.source(edge)));
        Ok(message)
    }

    fn make_belief(
        &mut self,
        vertex: G::Vertex,
        in_edges: &[G::Edge],
        messages: &EdgeMap<BTreeSet<usize>>,
        _beliefs: &VertexMap<BTreeSet<usize>>,
        graph: &G,
    ) -> Result<BTreeSet<usize>, String> {
        let vertex_index = graph.vertex_index(vertex);
        self.beliefs.push(vertex_index);
        let mut belief: BTreeSet<usize> = in_edges
            .iter()
            .flat_map(|e| messages.at(graph, *e).iter().copied())
            .collect();
        belief.insert(vertex_index);
        Ok(belief)
    }
}

/// Undirected tree given by the parent of every vertex but the root (vertex 0), each tree edge
/// being a reciprocal pair.
pub fn reciprocal_tree(parents: &[usize]) -> DiGraph {
    let mut graph = DiGraph::with_vertices(parents.len() + 1);
    for (i, parent) in parents.iter().enumerate() {
        assert!(*parent <= i);
        graph.add_reciprocal_edge(*parent, i + 1);
    }
    graph
}

pub fn all_vertices(n: usize) -> BTreeSet<usize> {
    (0..n).collect()
}
