use super::gd_parser::{Link, Statement};
use super::{GraphBuildError, NamedGraph};

pub(super) fn build_graph(stmts: &[Statement]) -> Result<NamedGraph, GraphBuildError> {
    let mut graph = NamedGraph::new();
    for s in stmts {
        if let Statement::VertexDecl(vertices) = s {
            for v in vertices {
                graph.add_vertex(v.0.clone())?;
            }
        }
    }
    for s in stmts {
        match s {
            Statement::Edge {
                from,
                link: Link::Directed,
                to,
            } => {
                graph.add_edge(&from.0, &to.0)?;
            }
            Statement::Edge {
                from,
                link: Link::Reciprocal,
                to,
            } => {
                graph.add_reciprocal_edge(&from.0, &to.0)?;
            }
            Statement::VertexDecl(_) | Statement::Empty | Statement::Invalid => {}
        }
    }
    Ok(graph)
}
