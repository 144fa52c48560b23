//! Scheduling of message computations.
//!
//! The graph is traversed with a FIFO work queue of vertices. When a vertex is visited, its
//! incoming edges are split between resolved (`known`) and not yet resolved (`unknown`) ones:
//! - if all incoming messages are known, all outgoing messages can be computed;
//! - if exactly one incoming message, coming from `w`, is unknown, the outgoing messages towards
//!   `w` can be computed, since a message never depends on the message in the reverse direction;
//! - otherwise the vertex is not ready, it will be visited again when one of its incoming
//!   messages gets resolved.
//!
//! Every computed message enqueues its target. Initial vertices (seeds) are the vertices without
//! incoming edges and the leaves of reciprocal pairs. On a forest made of reciprocal pairs and
//! single-parent edges, every message ends up resolved. On other graphs some messages may stay
//! unresolved, which is reported in [`Propagation`] but not treated as an error.
//!
//! Beliefs are computed once the queue is drained, from all incoming messages of each vertex.

use std::collections::VecDeque;

use tracing::{debug, instrument, trace, warn};

use crate::graph::BpGraph;
use crate::property_map::{EdgeMap, VertexMap};
use crate::utils::DelayedProgress;
use crate::{BpError, Config};

/// Numeric part of belief propagation.
///
/// The engine decides when messages and beliefs can be computed, the visitor computes them. The
/// values returned by [`Visitor::make_message`] and [`Visitor::make_belief`] are stored by the
/// engine in the slot of the edge (resp. vertex).
pub trait Visitor<G: BpGraph> {
    type Message;
    type Belief;
    type Error;

    /// Set the initial value of all messages.
    fn init_messages(
        &mut self,
        messages: &mut EdgeMap<Self::Message>,
        graph: &G,
    ) -> Result<(), Self::Error>;

    /// Set the initial value of all beliefs.
    fn init_beliefs(
        &mut self,
        beliefs: &mut VertexMap<Self::Belief>,
        graph: &G,
    ) -> Result<(), Self::Error>;

    /// Compute the message on `edge`.
    ///
    /// `known_in_edges` are the resolved incoming edges of the source of `edge`, excluding the
    /// ones coming from the target of `edge`.
    fn make_message(
        &mut self,
        edge: G::Edge,
        known_in_edges: &[G::Edge],
        messages: &EdgeMap<Self::Message>,
        graph: &G,
    ) -> Result<Self::Message, Self::Error>;

    /// Compute the belief of `vertex` from all its incoming edges, resolved or not.
    fn make_belief(
        &mut self,
        vertex: G::Vertex,
        in_edges: &[G::Edge],
        messages: &EdgeMap<Self::Message>,
        beliefs: &VertexMap<Self::Belief>,
        graph: &G,
    ) -> Result<Self::Belief, Self::Error>;
}

/// Resolved flag of every edge, indexed by edge index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionMap {
    resolved: Vec<bool>,
    n_resolved: usize,
}

impl ResolutionMap {
    pub fn new(n_edges: usize) -> Self {
        Self {
            resolved: vec![false; n_edges],
            n_resolved: 0,
        }
    }
    pub fn is_resolved(&self, edge_index: usize) -> bool {
        self.resolved[edge_index]
    }
    fn resolve(&mut self, edge_index: usize) {
        assert!(
            !self.resolved[edge_index],
            "Message {} resolved twice.",
            edge_index
        );
        self.resolved[edge_index] = true;
        self.n_resolved += 1;
    }
    pub fn len(&self) -> usize {
        self.resolved.len()
    }
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
    pub fn n_resolved(&self) -> usize {
        self.n_resolved
    }
    pub fn is_complete(&self) -> bool {
        self.n_resolved == self.resolved.len()
    }
    /// Indices of the edges that are not resolved.
    pub fn unresolved(&self) -> impl Iterator<Item = usize> + '_ {
        self.resolved
            .iter()
            .enumerate()
            .filter_map(|(i, r)| (!r).then_some(i))
    }
}

/// Summary of a belief propagation run.
#[derive(Debug, Clone)]
pub struct Propagation {
    resolution: ResolutionMap,
    n_seeds: usize,
    n_visits: usize,
    n_messages: usize,
}

impl Propagation {
    pub fn resolution(&self) -> &ResolutionMap {
        &self.resolution
    }
    pub fn n_seeds(&self) -> usize {
        self.n_seeds
    }
    /// Number of vertices taken out of the work queue (a vertex may be visited many times).
    pub fn n_visits(&self) -> usize {
        self.n_visits
    }
    pub fn n_messages(&self) -> usize {
        self.n_messages
    }
    pub fn is_complete(&self) -> bool {
        self.resolution.is_complete()
    }
    /// Fails if some message was never computed, in which case it still holds its initial value.
    pub fn ensure_complete(&self) -> crate::Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(BpError::Unresolved {
                n_unresolved: self.resolution.len() - self.resolution.n_resolved(),
                n_edges: self.resolution.len(),
            })
        }
    }
    pub fn unresolved_edges<G: BpGraph>(&self, graph: &G) -> Vec<G::Edge> {
        graph
            .edges()
            .filter(|e| !self.resolution.is_resolved(graph.edge_index(*e)))
            .collect()
    }
}

/// Vertices from which propagation can start: no incoming edge, or a single incoming edge whose
/// reverse is one of the outgoing edges.
pub fn find_seeds<G: BpGraph>(graph: &G) -> Vec<G::Vertex> {
    graph.vertices().filter(|v| is_seed(graph, *v)).collect()
}

fn is_seed<G: BpGraph>(graph: &G, vertex: G::Vertex) -> bool {
    let mut in_edges = graph.in_edges(vertex);
    match (in_edges.next(), in_edges.next()) {
        (None, _) => true,
        (Some(in_edge), None) => {
            let neighbor = graph.source(in_edge);
            graph.out_edges(vertex).any(|e| graph.target(e) == neighbor)
        }
        _ => false,
    }
}

/// Run belief propagation, filling `messages` and `beliefs`.
///
/// Both stores must be sized for `graph`. Errors from the visitor abort the run and are returned
/// as is.
#[instrument(skip_all, fields(n_vertices = graph.num_vertices(), n_edges = graph.num_edges()))]
pub fn apply_belief_propagation<G, V>(
    graph: &G,
    visitor: &mut V,
    messages: &mut EdgeMap<V::Message>,
    beliefs: &mut VertexMap<V::Belief>,
    config: &Config,
) -> Result<Propagation, V::Error>
where
    G: BpGraph,
    V: Visitor<G>,
{
    assert_eq!(
        messages.len(),
        graph.num_edges(),
        "Message store does not match the graph."
    );
    assert_eq!(
        beliefs.len(),
        graph.num_vertices(),
        "Belief store does not match the graph."
    );
    visitor.init_messages(messages, graph)?;
    visitor.init_beliefs(beliefs, graph)?;

    let mut resolution = ResolutionMap::new(graph.num_edges());
    let mut queue: VecDeque<G::Vertex> = find_seeds(graph).into();
    let n_seeds = queue.len();
    debug!(n_seeds, "starting propagation");

    let mut progress =
        DelayedProgress::new(graph.num_edges() as u64, "Propagating messages...", config);
    let mut known_in_edges = Vec::new();
    let mut unknown_in_edges = Vec::new();
    let mut pending_out_edges = Vec::new();
    let mut dependencies = Vec::new();
    let mut n_visits = 0;
    let mut n_messages = 0;
    while let Some(vertex) = queue.pop_front() {
        n_visits += 1;
        progress.set_position(resolution.n_resolved() as u64);
        known_in_edges.clear();
        unknown_in_edges.clear();
        pending_out_edges.clear();
        for edge in graph.in_edges(vertex) {
            if resolution.is_resolved(graph.edge_index(edge)) {
                known_in_edges.push(edge);
            } else {
                unknown_in_edges.push(edge);
            }
        }
        pending_out_edges.extend(
            graph
                .out_edges(vertex)
                .filter(|e| !resolution.is_resolved(graph.edge_index(*e))),
        );
        // With one unknown incoming message, only the messages sent back to its source are ready.
        let only_towards = match unknown_in_edges.as_slice() {
            [] => None,
            [edge] => Some(graph.source(*edge)),
            _ => continue,
        };
        for &edge in pending_out_edges.iter() {
            let target = graph.target(edge);
            if only_towards.is_some_and(|w| w != target) {
                continue;
            }
            dependencies.clear();
            dependencies.extend(
                known_in_edges
                    .iter()
                    .copied()
                    .filter(|e| graph.source(*e) != target),
            );
            let message = visitor.make_message(edge, &dependencies, messages, graph)?;
            let edge_index = graph.edge_index(edge);
            messages[edge_index] = message;
            resolution.resolve(edge_index);
            n_messages += 1;
            trace!(?edge, n_dependencies = dependencies.len(), "message resolved");
            queue.push_back(target);
        }
    }
    drop(progress);

    let mut in_edges = Vec::new();
    for vertex in graph.vertices() {
        in_edges.clear();
        in_edges.extend(graph.in_edges(vertex));
        let belief = visitor.make_belief(vertex, &in_edges, messages, beliefs, graph)?;
        beliefs[graph.vertex_index(vertex)] = belief;
    }

    if !resolution.is_complete() {
        warn!(
            n_unresolved = resolution.len() - resolution.n_resolved(),
            "some messages were never resolved, beliefs use their initial value"
        );
    }
    debug!(n_visits, n_messages, "propagation done");
    Ok(Propagation {
        resolution,
        n_seeds,
        n_visits,
        n_messages,
    })
}

/// Stores and summary produced by [`run_belief_propagation`].
#[derive(Debug, Clone)]
pub struct BpOutput<M, B> {
    pub messages: EdgeMap<M>,
    pub beliefs: VertexMap<B>,
    pub propagation: Propagation,
}

/// Allocate default message and belief stores for `graph`, then run belief propagation on them.
pub fn run_belief_propagation<G, V>(
    graph: &G,
    visitor: &mut V,
    config: &Config,
) -> Result<BpOutput<V::Message, V::Belief>, V::Error>
where
    G: BpGraph,
    V: Visitor<G>,
    V::Message: Default,
    V::Belief: Default,
{
    let mut messages = EdgeMap::new(graph);
    let mut beliefs = VertexMap::new(graph);
    let propagation =
        apply_belief_propagation(graph, visitor, &mut messages, &mut beliefs, config)?;
    Ok(BpOutput {
        messages,
        beliefs,
        propagation,
    })
}
