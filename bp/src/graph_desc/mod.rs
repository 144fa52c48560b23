//! Textual description of propagation graphs.
//!
//! ```text
//! # vertices must be declared, in any order with respect to edges
//! VERTEX a b c
//! EDGE a -> b   # single directed edge
//! EDGE b -- c   # reciprocal pair: b -> c and c -> b
//! ```
mod gd_build;
mod gd_parser;
mod named_graph;

pub use named_graph::NamedGraph;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphBuildError {
    #[error("Invalid graph description:\n{0}")]
    Parse(String),
    #[error("Vertex {0} declared multiple times.")]
    MultipleVertexDecl(String),
    #[error("Vertex {0} not declared.")]
    UnknownVertex(String),
    #[error("Edge from vertex {0} to itself.")]
    SelfLoop(String),
}

pub fn build_graph(description: &str) -> Result<NamedGraph, GraphBuildError> {
    let stmts = gd_parser::parse(description)
        .map_err(|e| GraphBuildError::Parse(String::from_utf8_lossy(e.as_slice()).into_owned()))?;
    gd_build::build_graph(stmts.as_slice())
}
