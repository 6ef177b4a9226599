//! file: core/src/ast/expr.rs
//! description: expression parsing helpers.
//!
//! Operator precedence is resolved with pest's `PrattParser`; everything
//! below the operator level (literals, `if`, function literals, templates)
//! is built by `parse_primary_rule`.
//!
use lazy_static::lazy_static;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::{
    ast::{
        AstNode, AstNodeKind, BinaryOperator, Param, Rule, UnaryOperator, err::SyntaxError, rules,
    },
    error::AiscErrorExt,
    script,
};

type ParseResult = Result<AstNode, Box<dyn AiscErrorExt>>;

lazy_static! {
    static ref PRATT: PrattParser<Rule> = PrattParser::new()
        .op(Op::infix(Rule::or, Assoc::Left))
        .op(Op::infix(Rule::and, Assoc::Left))
        .op(Op::infix(Rule::eq, Assoc::Left) | Op::infix(Rule::neq, Assoc::Left))
        .op(Op::infix(Rule::lt, Assoc::Left)
            | Op::infix(Rule::lteq, Assoc::Left)
            | Op::infix(Rule::gt, Assoc::Left)
            | Op::infix(Rule::gteq, Assoc::Left))
        .op(Op::infix(Rule::add, Assoc::Left) | Op::infix(Rule::sub, Assoc::Left))
        .op(Op::infix(Rule::mul, Assoc::Left)
            | Op::infix(Rule::div, Assoc::Left)
            | Op::infix(Rule::rem, Assoc::Left))
        .op(Op::infix(Rule::pow, Assoc::Right))
        .op(Op::prefix(Rule::neg) | Op::prefix(Rule::pos) | Op::prefix(Rule::not))
        .op(Op::postfix(Rule::call_args)
            | Op::postfix(Rule::index_op)
            | Op::postfix(Rule::prop_op));
}

/// Parse an `expr` rule into an expression `AstNode`.
///
/// Binary and postfix nodes take the location of their left-most operand so
/// diagnostics point at the start of the whole expression.
pub(crate) fn parse_expression_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    PRATT
        .map_primary(|primary| parse_primary_rule(primary, script))
        .map_prefix(|op, rhs| {
            let rhs = rhs?;
            let location = rules::get_location_from_pair(&op, script);
            let span = rules::get_span_from_pair(&op, script);
            let op = match op.as_rule() {
                Rule::neg => UnaryOperator::Minus,
                Rule::pos => UnaryOperator::Plus,
                _ => UnaryOperator::Not,
            };
            // `-1` is a literal, not a negation of one.
            if let (UnaryOperator::Minus, AstNodeKind::Number { value }) = (op, &rhs.kind) {
                return Ok(AstNode::new(AstNodeKind::Number { value: -value }, location, span));
            }
            Ok(AstNode::new(
                AstNodeKind::UnaryOp { op, expr: Box::new(rhs) },
                location,
                span,
            ))
        })
        .map_postfix(|lhs, op| {
            let lhs = lhs?;
            parse_postfix_rule(lhs, op, script)
        })
        .map_infix(|lhs, op, rhs| {
            let lhs = lhs?;
            let rhs = rhs?;
            let op = match op.as_rule() {
                Rule::or => BinaryOperator::Or,
                Rule::and => BinaryOperator::And,
                Rule::eq => BinaryOperator::Eq,
                Rule::neq => BinaryOperator::Ne,
                Rule::lt => BinaryOperator::Lt,
                Rule::lteq => BinaryOperator::Le,
                Rule::gt => BinaryOperator::Gt,
                Rule::gteq => BinaryOperator::Ge,
                Rule::add => BinaryOperator::Add,
                Rule::sub => BinaryOperator::Sub,
                Rule::mul => BinaryOperator::Mul,
                Rule::div => BinaryOperator::Div,
                Rule::rem => BinaryOperator::Rem,
                Rule::pow => BinaryOperator::Pow,
                other => {
                    return Err(SyntaxError::boxed(
                        format!("Invalid binary operator: {:?}", other),
                        "aisc.ast.expr.parse_expression_rule",
                        rules::get_location_from_pair(&op, script),
                        rules::get_span_from_pair(&op, script),
                    ));
                }
            };
            let (location, span) = (lhs.location.clone(), lhs.span.clone());
            Ok(AstNode::new(
                AstNodeKind::BinaryOp { left: Box::new(lhs), op, right: Box::new(rhs) },
                location,
                span,
            ))
        })
        .parse(pair.into_inner())
}

fn parse_postfix_rule(lhs: AstNode, op: Pair<Rule>, script: &script::Script) -> ParseResult {
    let (location, span) = (lhs.location.clone(), lhs.span.clone());
    let kind = match op.as_rule() {
        Rule::call_args => {
            let args = op
                .into_inner()
                .map(|arg| parse_expression_rule(arg, script))
                .collect::<Result<Vec<_>, _>>()?;
            AstNodeKind::Call { callee: Box::new(lhs), args }
        }
        Rule::index_op => {
            let (mut inner, loc, sp) = rules::get_data_from_rule(&op, script);
            let index = rules::fetch_next_pair(&mut inner, &loc, &sp)?;
            AstNodeKind::Index {
                object: Box::new(lhs),
                index: Box::new(parse_expression_rule(index, script)?),
            }
        }
        _ => {
            let (mut inner, loc, sp) = rules::get_data_from_rule(&op, script);
            let property = rules::fetch_next_pair(&mut inner, &loc, &sp)?;
            AstNodeKind::Member { object: Box::new(lhs), property: property.as_str().to_string() }
        }
    };
    Ok(AstNode::new(kind, location, span))
}

/// Parse any primary expression, including the pattern forms used by `dest`.
pub(crate) fn parse_primary_rule(pair: Pair<Rule>, script: &script::Script) -> ParseResult {
    let (mut inner, location, span) = rules::get_data_from_rule(&pair, script);
    let kind = match pair.as_rule() {
        Rule::expr => return parse_expression_rule(pair, script),
        Rule::dest => {
            let pattern = rules::fetch_next_pair(&mut inner, &location, &span)?;
            return parse_primary_rule(pattern, script);
        }
        Rule::null_lit => AstNodeKind::Null,
        Rule::bool_lit => AstNodeKind::Bool { value: pair.as_str() == "true" },
        Rule::number => {
            let value = pair.as_str().parse::<f64>().map_err(|_| {
                SyntaxError::boxed(
                    format!("Invalid number literal '{}'.", pair.as_str()),
                    "aisc.ast.expr.parse_primary_rule",
                    location.clone(),
                    span.clone(),
                )
            })?;
            AstNodeKind::Number { value }
        }
        Rule::string => {
            let body = rules::fetch_next_pair(&mut inner, &location, &span)?;
            AstNodeKind::String { value: unescape(body.as_str()) }
        }
        Rule::template => {
            let mut parts = Vec::new();
            for part in inner {
                match part.as_rule() {
                    Rule::tmpl_text => parts.push(AstNode::new(
                        AstNodeKind::String { value: unescape(part.as_str()) },
                        rules::get_location_from_pair(&part, script),
                        rules::get_span_from_pair(&part, script),
                    )),
                    _ => {
                        let (mut embed, loc, sp) = rules::get_data_from_rule(&part, script);
                        let expr = rules::fetch_next_pair(&mut embed, &loc, &sp)?;
                        parts.push(parse_expression_rule(expr, script)?);
                    }
                }
            }
            AstNodeKind::Template { parts }
        }
        Rule::array => AstNodeKind::Array {
            elements: inner
                .map(|element| parse_expression_rule(element, script))
                .collect::<Result<Vec<_>, _>>()?,
        },
        Rule::object => {
            let mut entries = Vec::new();
            for entry in inner {
                let (mut parts, loc, sp) = rules::get_data_from_rule(&entry, script);
                let key = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
                let key = match key.as_rule() {
                    Rule::string => key
                        .into_inner()
                        .next()
                        .map(|body| unescape(body.as_str()))
                        .unwrap_or_default(),
                    _ => key.as_str().to_string(),
                };
                let value = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
                entries.push((key, parse_expression_rule(value, script)?));
            }
            AstNodeKind::Object { entries }
        }
        Rule::name | Rule::ident => AstNodeKind::Identifier { name: pair.as_str().to_string() },
        Rule::exists_expr => {
            let name = rules::fetch_next_pair(&mut inner, &location, &span)?;
            AstNodeKind::Exists { name: name.as_str().to_string() }
        }
        Rule::eval_expr => {
            let block = rules::fetch_next_pair(&mut inner, &location, &span)?;
            return super::stmt::parse_block_rule(block, script);
        }
        Rule::if_expr => parse_if_rule(inner, &location, &span, script)?,
        Rule::match_expr => {
            let about = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let about = parse_expression_rule(about, script)?;
            let mut arms = Vec::new();
            let mut default = None;
            for arm in inner {
                let is_default = arm.as_rule() == Rule::match_default;
                let (mut parts, loc, sp) = rules::get_data_from_rule(&arm, script);
                if is_default {
                    let body = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
                    default = Some(Box::new(super::stmt::parse_body_rule(body, script)?));
                } else {
                    let pattern = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
                    let body = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
                    arms.push((
                        parse_expression_rule(pattern, script)?,
                        super::stmt::parse_body_rule(body, script)?,
                    ));
                }
            }
            AstNodeKind::Match { about: Box::new(about), arms, default }
        }
        Rule::fn_lit => {
            let params = rules::fetch_next_pair(&mut inner, &location, &span)?;
            let block = rules::fetch_next_pair(&mut inner, &location, &span)?;
            AstNodeKind::Function {
                params: parse_params_rule(params, script)?,
                body: super::stmt::parse_statements_of_block(block, script)?,
            }
        }
        other => {
            return Err(SyntaxError::boxed(
                format!("Unexpected expression type: {:?}", other),
                "aisc.ast.expr.parse_primary_rule",
                location,
                span,
            ));
        }
    };
    Ok(AstNode::new(kind, location, span))
}

fn parse_if_rule(
    mut inner: pest::iterators::Pairs<Rule>,
    location: &Option<crate::location::Location>,
    span: &Option<crate::location::Span>,
    script: &script::Script,
) -> Result<AstNodeKind, Box<dyn AiscErrorExt>> {
    let cond = rules::fetch_next_pair(&mut inner, location, span)?;
    let then = rules::fetch_next_pair(&mut inner, location, span)?;
    let cond = parse_expression_rule(cond, script)?;
    let then = super::stmt::parse_body_rule(then, script)?;

    let mut elifs = Vec::new();
    let mut else_ = None;
    for arm in inner {
        let is_else = arm.as_rule() == Rule::else_arm;
        let (mut parts, loc, sp) = rules::get_data_from_rule(&arm, script);
        if is_else {
            let body = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
            else_ = Some(Box::new(super::stmt::parse_body_rule(body, script)?));
        } else {
            let cond = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
            let body = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
            elifs.push((
                parse_expression_rule(cond, script)?,
                super::stmt::parse_body_rule(body, script)?,
            ));
        }
    }

    Ok(AstNodeKind::If { cond: Box::new(cond), then: Box::new(then), elifs, else_ })
}

pub(crate) fn parse_params_rule(
    pair: Pair<Rule>,
    script: &script::Script,
) -> Result<Vec<Param>, Box<dyn AiscErrorExt>> {
    let mut params = Vec::new();
    for param in pair.into_inner() {
        let (mut parts, loc, sp) = rules::get_data_from_rule(&param, script);
        let dest = rules::fetch_next_pair(&mut parts, &loc, &sp)?;
        let dest = parse_primary_rule(dest, script)?;
        let default = match parts.next() {
            Some(expr) => Some(parse_expression_rule(expr, script)?),
            None => None,
        };
        params.push(Param { dest, default });
    }
    Ok(params)
}

/// A backslash takes the following character literally.
pub(crate) fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
