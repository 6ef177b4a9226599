//! file: core/src/ast/stmt.rs
//! description: parsing helpers for top-level items and statements.
//!
//! This module contains functions that parse `namespace`, `meta` and
//! `statement` rules from the `pest`-generated `RulesParser` into `AstNode`
//! structures. Sugar forms are desugared here: `<: x` becomes a call to
//! `print` and `@f() {}` becomes an immutable definition of a function
//! literal.
//!
use pest::iterators::Pair;

use crate::{
    ast::{AssignOperator, AstNode, AstNodeKind, Rule, err::SyntaxError, expr, rules},
    error::AiscErrorExt,
    script,
};

type ParseResult = Result<AstNode, Box<dyn AiscErrorExt>>;

/// Parse a single top-level item: a namespace, a meta block or a statement.
pub(crate) fn parse_item_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    let (mut inner, location, span) = rules::get_data_from_rule(&pair, script);
    match pair.as_rule() {
        Rule::namespace => {
            let name = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let members = inner
                .map(|member| parse_item_rule(member, script))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AstNode::new(
                AstNodeKind::Namespace { name: name.as_str().to_string(), members },
                location,
                span,
            ))
        }
        Rule::meta => {
            let first = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let (name, value) = match first.as_rule() {
                Rule::meta_name => {
                    let value = rules::fetch_next_pair(&mut inner, &location, &span)?;
                    (Some(first.as_str().to_string()), value)
                }
                _ => (None, first),
            };
            Ok(AstNode::new(
                AstNodeKind::Meta {
                    name,
                    value: Box::new(expr::parse_expression_rule(value, script)?),
                },
                location,
                span,
            ))
        }
        Rule::statement => parse_statement_rule(pair, script),
        Rule::definition | Rule::fn_def => parse_inner_statement_rule(pair, script),
        other => Err(SyntaxError::boxed(
            format!("Unexpected rule in item parsing: {:?}", other),
            "aisc.ast.stmt.parse_item_rule",
            location,
            span,
        )),
    }
}

pub(crate) fn parse_statement_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    let (mut inner, location, span) = rules::get_data_from_rule(&pair, script);
    let next = rules::fetch_next_pair(&mut inner, &location, &span)?;
    parse_inner_statement_rule(next, script)
}

fn parse_inner_statement_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    let (mut inner, location, span) = rules::get_data_from_rule(&pair, script);
    let kind = match pair.as_rule() {
        Rule::expr => return expr::parse_expression_rule(pair, script),
        Rule::definition => {
            let decl = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let dest = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let init = match inner.next() {
                Some(init) => Some(Box::new(expr::parse_expression_rule(init, script)?)),
                None => None,
            };
            AstNodeKind::Definition {
                dest: Box::new(expr::parse_primary_rule(dest, script)?),
                expr: init,
                mutable: decl.as_str() == "var",
            }
        }
        Rule::fn_def => {
            let name = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let params = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let block = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let function = AstNode::new(
                AstNodeKind::Function {
                    params: expr::parse_params_rule(params, script)?,
                    body: parse_statements_of_block(block, script)?,
                },
                location.clone(),
                span.clone(),
            );
            let dest = AstNode::new(
                AstNodeKind::Identifier { name: name.as_str().to_string() },
                rules::get_location_from_pair(&name, script),
                rules::get_span_from_pair(&name, script),
            );
            AstNodeKind::Definition {
                dest: Box::new(dest),
                expr: Some(Box::new(function)),
                mutable: false,
            }
        }
        Rule::out_stmt => {
            let value = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let callee = AstNode::new(
                AstNodeKind::Identifier { name: "print".to_string() },
                location.clone(),
                span.clone(),
            );
            AstNodeKind::Call {
                callee: Box::new(callee),
                args: vec![expr::parse_expression_rule(value, script)?],
            }
        }
        Rule::return_stmt => {
            let value = rules::fetch_next_pair(&mut inner, &location, &span)?;
            AstNodeKind::Return { expr: Box::new(expr::parse_expression_rule(value, script)?) }
        }
        Rule::each_stmt => {
            let head = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let body = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let (mut head_parts, loc, sp) = rules::get_data_from_rule(&head, script);
            let var = rules::fetch_next_pair(&mut head_parts, &loc, &sp)?;
            let items = rules::fetch_next_pair(&mut head_parts, &loc, &sp)?;
            AstNodeKind::Each {
                var: Box::new(expr::parse_primary_rule(var, script)?),
                items: Box::new(expr::parse_expression_rule(items, script)?),
                body: Box::new(parse_body_rule(body, script)?),
            }
        }
        Rule::for_range => {
            let head = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let body = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let (mut head_parts, loc, sp) = rules::get_data_from_rule(&head, script);
            let var = rules::fetch_next_pair(&mut head_parts, &loc, &sp)?;
            let mut next = rules::fetch_next_pair(&mut head_parts, &loc, &sp)?;
            let from = if next.as_rule() == Rule::range_from {
                let (mut from_parts, from_loc, from_sp) = rules::get_data_from_rule(&next, script);
                let from = rules::fetch_next_pair(&mut from_parts, &from_loc, &from_sp)?;
                next = rules::fetch_next_pair(&mut head_parts, &loc, &sp)?;
                expr::parse_expression_rule(from, script)?
            } else {
                AstNode::new(AstNodeKind::Number { value: 0.0 }, loc.clone(), sp.clone())
            };
            AstNodeKind::ForRange {
                var: var.as_str().to_string(),
                from: Box::new(from),
                to: Box::new(expr::parse_expression_rule(next, script)?),
                body: Box::new(parse_body_rule(body, script)?),
            }
        }
        Rule::for_times => {
            let times = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let body = rules::fetch_next_pair(&mut inner, &location, &span)?;
            AstNodeKind::ForTimes {
                times: Box::new(expr::parse_expression_rule(times, script)?),
                body: Box::new(parse_body_rule(body, script)?),
            }
        }
        Rule::loop_stmt => {
            let block = rules::fetch_next_pair(&mut inner, &location, &span)?;
            AstNodeKind::Loop { statements: parse_statements_of_block(block, script)? }
        }
        Rule::break_stmt => AstNodeKind::Break,
        Rule::continue_stmt => AstNodeKind::Continue,
        Rule::assign_stmt => {
            let dest = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let op = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let value = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let op = match op.as_str() {
                "+=" => AssignOperator::AddAssign,
                "-=" => AssignOperator::SubAssign,
                _ => AssignOperator::Assign,
            };
            AstNodeKind::Assignment {
                op,
                dest: Box::new(expr::parse_expression_rule(dest, script)?),
                expr: Box::new(expr::parse_expression_rule(value, script)?),
            }
        }
        other => {
            return Err(SyntaxError::boxed(
                format!("Unexpected statement type: {:?}", other),
                "aisc.ast.stmt.parse_inner_statement_rule",
                location,
                span,
            ));
        }
    };
    Ok(AstNode::new(kind, location, span))
}

/// Parse a `body` rule: a braced block becomes a `Block` node, a bare
/// statement is returned as is.
pub(crate) fn parse_body_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    let (mut inner, location, span) = rules::get_data_from_rule(&pair, script);
    let next = rules::fetch_next_pair(&mut inner, &location, &span)?;
    match next.as_rule() {
        Rule::block => parse_block_rule(next, script),
        _ => parse_statement_rule(next, script),
    }
}

pub(crate) fn parse_block_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    let location = rules::get_location_from_pair(&pair, script);
    let span = rules::get_span_from_pair(&pair, script);
    let statements = parse_statements_of_block(pair, script)?;
    Ok(AstNode::new(AstNodeKind::Block { statements }, location, span))
}

pub(crate) fn parse_statements_of_block(
    pair: Pair<Rule>,
    script: &script::Script,
) -> Result<Vec<AstNode>, Box<dyn AiscErrorExt>> {
    let (mut inner, location, span) = rules::get_data_from_rule(&pair, script);
    let statements = rules::fetch_next_pair(&mut inner, &location, &span)?;
    statements
        .into_inner()
        .map(|statement| parse_statement_rule(statement, script))
        .collect()
}
