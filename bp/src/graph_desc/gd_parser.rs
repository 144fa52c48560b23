use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use chumsky::prelude::*;

#[derive(Debug, Clone)]
pub(super) struct Vertex(pub(super) String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Link {
    Directed,
    Reciprocal,
}

#[derive(Debug, Clone)]
pub(super) enum Statement {
    Invalid,
    Empty,
    VertexDecl(Vec<Vertex>),
    Edge { from: Vertex, link: Link, to: Vertex },
}

fn parser() -> impl Parser<char, Vec<Statement>, Error = Simple<char>> {
    let pad = just(' ').or(just('\t')).repeated();
    let space = pad.at_least(1);
    let op = |c| just(c).delimited_by(pad, pad);
    let ident = pad.ignore_then(text::ident()).then_ignore(pad);
    let kw = |s| text::keyword::<_, _, Simple<char>>(s).delimited_by(pad, space);
    let vertex = ident.map(Vertex);
    let vertex_decl = kw("VERTEX")
        .ignore_then(vertex.clone().repeated().at_least(1))
        .map(Statement::VertexDecl);
    let link = just("->")
        .to(Link::Directed)
        .or(just("--").to(Link::Reciprocal))
        .delimited_by(pad, pad);
    let edge = kw("EDGE")
        .ignore_then(vertex.clone())
        .then(link)
        .then(vertex)
        .map(|((from, link), to)| Statement::Edge { from, link, to });
    let comment = op('#').then_ignore(filter(|c| *c != '\n' && *c != '\r').repeated());
    vertex_decl
        .or(edge)
        .or(pad.at_least(0).to(Statement::Empty))
        .then_ignore(comment.or_not())
        .recover_with(skip_until(['\n', '\r'], |_| Statement::Invalid))
        .separated_by(text::newline())
        .allow_leading()
        .allow_trailing()
        .then_ignore(end())
}

/// Parse the graph description in src, and returns the statements if no
/// error, otherwise the error is a locale-encoded error message.
pub(super) fn parse(src: &str) -> Result<Vec<Statement>, Vec<u8>> {
    let (graph, errs) = parser().parse_recovery_verbose(src);
    let err = !errs.is_empty();
    let mut err_str = Vec::new();
    for e in errs {
        let msg = if let chumsky::error::SimpleReason::Custom(msg) = e.reason() {
            msg.clone()
        } else {
            format!(
                "Unexpected token, expected {}",
                if e.expected().len() == 0 {
                    "something else".to_string()
                } else {
                    e.expected()
                        .map(|expected| match expected {
                            Some(expected) => format!("{:?}", expected),
                            None => "end of input".to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(", ")
                },
            )
        };
        let report = Report::build(ReportKind::Error, (), e.span().start)
            .with_message(msg.clone())
            .with_label(
                Label::new(e.span())
                    .with_message(match e.reason() {
                        chumsky::error::SimpleReason::Custom(msg) => msg.clone(),
                        _ => format!(
                            "Unexpected {}",
                            e.found()
                                .map(|c| format!("token {}", format!("{:?}", c).fg(Color::Red)))
                                .unwrap_or_else(|| "end of input".to_string())
                        ),
                    })
                    .with_color(Color::Red),
            );
        if report
            .finish()
            .write(Source::from(src), &mut err_str)
            .is_err()
        {
            err_str.extend_from_slice(msg.as_bytes());
            err_str.push(b'\n');
        }
    }
    match graph {
        Some(graph) if !err => Ok(graph),
        _ => Err(err_str),
    }
}
