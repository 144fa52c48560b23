//! Single-pass belief propagation on trees.
//!
//! Messages live on the edges of a directed graph and beliefs on its vertices. An undirected
//! tree edge is modeled as a reciprocal pair of directed edges, one per message direction.
//! [`propagation::apply_belief_propagation`] schedules every message computation with a work
//! queue, so that each message is computed exactly once, after all the messages it depends on.
//! The arithmetic is provided by a [`propagation::Visitor`], see [`pairwise`] for sum-product and
//! max-product on discrete pairwise models.

pub mod distribution;
pub mod graph;
pub mod graph_desc;
pub mod pairwise;
#[cfg(feature = "petgraph")]
pub mod petgraph_compat;
pub mod property_map;
pub mod propagation;
pub(crate) mod utils;

pub use distribution::Distribution;
pub use graph::{BpGraph, DiGraph, EdgeId, VertexId};
pub use graph_desc::{build_graph, GraphBuildError, NamedGraph};
pub use pairwise::{PairwiseBp, PairwiseModel, Reduction};
pub use property_map::{EdgeMap, VertexMap};
pub use propagation::{
    apply_belief_propagation, find_seeds, run_belief_propagation, BpOutput, Propagation,
    ResolutionMap, Visitor,
};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BpError {
    #[error(
        "{n_unresolved} out of {n_edges} messages were never resolved \
         (the graph is not a forest of reciprocal pairs and single-parent edges)."
    )]
    Unresolved { n_unresolved: usize, n_edges: usize },
    #[error("Wrong number of classes for distribution: got {0}, expected {1}.")]
    WrongDistributionNc(usize, usize),
    #[error("Invalid distribution: {0}.")]
    InvalidDistribution(&'static str),
    #[error("Incorrect shape for pairwise potential: expected {expected:?}, got {got:?}.")]
    WrongPotentialShape {
        got: (usize, usize),
        expected: (usize, usize),
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    /// Computation time after which a progress bar is displayed.
    /// This avoids showing progress bars for negligible amounts of time.
    /// If None, never display the progress bar
    progress_min_time: Option<std::time::Duration>,
}

impl Config {
    pub fn with_default_timing() -> Self {
        Self {
            progress_min_time: Some(std::time::Duration::from_millis(500)),
        }
    }
    pub fn no_progress() -> Self {
        Self {
            progress_min_time: None,
        }
    }
    pub fn progress_min_time(&self) -> Option<std::time::Duration> {
        self.progress_min_time
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_default_timing()
    }
}
