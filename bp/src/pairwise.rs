//! Sum-product and max-product on discrete pairwise models.
//!
//! Every vertex is a variable taking `nc` values, with an evidence distribution φ. Every edge
//! `u -> w` carries a potential ψ[x_u, x_w]. The message on `u -> w` is
//! `m(x_w) = ⊕_{x_u} φ(x_u) ψ(x_u, x_w) Π_k m_k(x_u)`, where `k` ranges over the known incoming
//! messages of `u` and ⊕ is a sum (marginals) or a max (MAP). The belief of `v` is
//! `φ(x_v) Π_k m_k(x_v)` over all incoming messages of `v`.
//!
//! On a tree where every undirected edge is a reciprocal pair with transposed potentials, the
//! sum-product beliefs are the exact marginals.

use ndarray::{Array1, Array2, ArrayView2};

use crate::distribution::Distribution;
use crate::graph::BpGraph;
use crate::property_map::{EdgeMap, VertexMap};
use crate::propagation::Visitor;
use crate::BpError;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PairwiseModel {
    nc: usize,
    evidence: VertexMap<Distribution>,
    potentials: EdgeMap<Array2<f64>>,
}

impl PairwiseModel {
    /// Model without evidence and with constant potentials.
    pub fn new<G: BpGraph>(graph: &G, nc: usize) -> Self {
        Self {
            nc,
            evidence: VertexMap::from_elem(graph, Distribution::new(nc)),
            potentials: EdgeMap::from_elem(graph, Array2::ones((nc, nc))),
        }
    }
    pub fn nc(&self) -> usize {
        self.nc
    }
    pub fn set_evidence<G: BpGraph>(
        &mut self,
        graph: &G,
        vertex: G::Vertex,
        evidence: Distribution,
    ) -> Result<(), BpError> {
        if evidence.nc() != self.nc {
            return Err(BpError::WrongDistributionNc(evidence.nc(), self.nc));
        }
        *self.evidence.at_mut(graph, vertex) = evidence;
        Ok(())
    }
    pub fn drop_evidence<G: BpGraph>(&mut self, graph: &G, vertex: G::Vertex) {
        *self.evidence.at_mut(graph, vertex) = Distribution::new(self.nc);
    }
    pub fn evidence<G: BpGraph>(&self, graph: &G, vertex: G::Vertex) -> &Distribution {
        self.evidence.at(graph, vertex)
    }
    /// Set ψ for `edge`, indexed as (source value, target value).
    pub fn set_potential<G: BpGraph>(
        &mut self,
        graph: &G,
        edge: G::Edge,
        potential: Array2<f64>,
    ) -> Result<(), BpError> {
        if potential.dim() != (self.nc, self.nc) {
            return Err(BpError::WrongPotentialShape {
                got: potential.dim(),
                expected: (self.nc, self.nc),
            });
        }
        if potential.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Err(BpError::InvalidDistribution(
                "potentials must be finite and non-negative",
            ));
        }
        *self.potentials.at_mut(graph, edge) = potential;
        Ok(())
    }
    /// Set ψ for `edge` and ψᵀ for `reverse`, such that both directions of a reciprocal pair
    /// describe the same undirected potential.
    pub fn set_reciprocal_potential<G: BpGraph>(
        &mut self,
        graph: &G,
        edge: G::Edge,
        reverse: G::Edge,
        potential: Array2<f64>,
    ) -> Result<(), BpError> {
        let transposed = potential.t().to_owned();
        self.set_potential(graph, edge, potential)?;
        self.set_potential(graph, reverse, transposed)
    }
    pub fn potential<G: BpGraph>(&self, graph: &G, edge: G::Edge) -> ArrayView2<f64> {
        self.potentials.at(graph, edge).view()
    }
}

/// How the source variable is eliminated when computing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Max,
}

/// Visitor running sum-product or max-product on a [`PairwiseModel`].
#[derive(Debug, Clone, Copy)]
pub struct PairwiseBp<'a> {
    model: &'a PairwiseModel,
    reduction: Reduction,
}

impl<'a> PairwiseBp<'a> {
    pub fn new(model: &'a PairwiseModel, reduction: Reduction) -> Self {
        Self { model, reduction }
    }
    pub fn sum_product(model: &'a PairwiseModel) -> Self {
        Self::new(model, Reduction::Sum)
    }
    pub fn max_product(model: &'a PairwiseModel) -> Self {
        Self::new(model, Reduction::Max)
    }
    pub fn reduction(&self) -> Reduction {
        self.reduction
    }
}

impl<'a, G: BpGraph> Visitor<G> for PairwiseBp<'a> {
    type Message = Distribution;
    type Belief = Distribution;
    type Error = BpError;

    fn init_messages(
        &mut self,
        messages: &mut EdgeMap<Distribution>,
        graph: &G,
    ) -> Result<(), BpError> {
        assert_eq!(self.model.potentials.len(), graph.num_edges());
        messages
            .iter_mut()
            .for_each(|m| *m = Distribution::new(self.model.nc));
        Ok(())
    }

    fn init_beliefs(
        &mut self,
        beliefs: &mut VertexMap<Distribution>,
        graph: &G,
    ) -> Result<(), BpError> {
        assert_eq!(self.model.evidence.len(), graph.num_vertices());
        beliefs
            .iter_mut()
            .for_each(|b| *b = Distribution::new(self.model.nc));
        Ok(())
    }

    fn make_message(
        &mut self,
        edge: G::Edge,
        known_in_edges: &[G::Edge],
        messages: &EdgeMap<Distribution>,
        graph: &G,
    ) -> Result<Distribution, BpError> {
        let mut state = self.model.evidence(graph, graph.source(edge)).clone();
        state.multiply(known_in_edges.iter().map(|e| messages.at(graph, *e)))?;
        let state = state.to_array();
        let potential = self.model.potential(graph, edge);
        let message: Array1<f64> = match self.reduction {
            Reduction::Sum => potential.t().dot(&state),
            Reduction::Max => Array1::from_shape_fn(self.model.nc, |j| {
                potential
                    .column(j)
                    .iter()
                    .zip(state.iter())
                    .map(|(p, s)| p * s)
                    .fold(0.0, f64::max)
            }),
        };
        let mut message = Distribution::from_full(message);
        message.normalize();
        Ok(message)
    }

    fn make_belief(
        &mut self,
        vertex: G::Vertex,
        in_edges: &[G::Edge],
        messages: &EdgeMap<Distribution>,
        _beliefs: &VertexMap<Distribution>,
        graph: &G,
    ) -> Result<Distribution, BpError> {
        let mut belief = self.model.evidence(graph, vertex).clone();
        belief.multiply(in_edges.iter().map(|e| messages.at(graph, *e)))?;
        belief.normalize();
        Ok(belief)
    }
}
