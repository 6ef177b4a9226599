//! file: core/src/ast/mod.rs
//! description: reference front end producing the input AST.
//!
//! `generate_ast_from_source` parses a `Script` with the pest grammar in
//! `grammar.pest` and returns a `Script` node whose body holds the ordered
//! top-level nodes consumed by `lower::compile`.
pub mod err;
pub mod expr;
pub mod kind;
pub mod node;
pub mod rules;
pub mod stmt;

use log::debug;
use pest::Parser;
use pest::error::LineColLocation;

pub use crate::error::AiscErrorExt;
pub use kind::{AssignOperator, AstNodeKind, BinaryOperator, Param, UnaryOperator};
pub use node::AstNode;
pub use rules::{Rule, RulesParser};

use crate::location::{Location, Span};
use crate::script::Script;

pub fn generate_ast_from_source(script: &Script) -> Result<AstNode, Box<dyn AiscErrorExt>> {
    if script.is_empty() {
        return Err(Box::new(err::EmptyScriptError::new(
            "aisc.ast.generate_ast_from_source".into(),
            Some(Location::new(script.name.clone(), 1, 1)),
            None,
        )));
    }

    let mut pairs = RulesParser::parse(Rule::program, &script.content).map_err(|e| {
        let (start, end) = match e.line_col {
            LineColLocation::Pos(pos) => (pos, pos),
            LineColLocation::Span(start, end) => (start, end),
        };
        let location = Location::new(script.name.clone(), start.0, start.1);
        let span = Span::new(
            location.clone(),
            Location::new(script.name.clone(), end.0, end.1),
        );
        err::SyntaxError::boxed(
            e.variant.message().to_string(),
            "aisc.ast.generate_ast_from_source",
            Some(location),
            Some(span),
        )
    })?;

    let location = Some(Location::new(script.name.clone(), 1, 1));
    let program = rules::fetch_next_pair(&mut pairs, &location, &None)?;
    let body = program
        .into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(|pair| stmt::parse_item_rule(pair, script))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("parsed {} top-level node(s) from {}", body.len(), script.name);
    Ok(AstNode::new(AstNodeKind::Script { body }, location, None))
}
