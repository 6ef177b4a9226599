//! file: core/src/lower/lower_dest.rs
//! description: destructuring of definition and assignment patterns.
//!
//! Patterns are identifier, array and object nodes, nested arbitrarily.
//! Composite patterns first bind the incoming value to a temporary so it
//! is evaluated exactly once, then recurse element by element in source
//! order through `get_index` / `get_prop`.
use std::rc::Rc;

use crate::ast::{AstNode, AstNodeKind};
use crate::js::primitives::{GET_INDEX, GET_PROP, SET_INDEX, SET_PROP};
use crate::js::{AssignOp, DeclKind, ErrorCode, Expr, Stmt};

use super::err::{LowerError, LowerErrorKind};
use super::lower_expr::{bind_ref, lower_expression, lower_ref};
use super::lowering_context::LoweringContext;
use super::scope::Scope;
use super::utils::internal_error;

fn invalid_destination(node: &AstNode, issuer: &str) -> LowerError {
    LowerError::new(
        LowerErrorKind::InvalidDestination,
        format!("{} is not a valid destination.", node.kind),
        issuer,
        node.get_location().cloned(),
    )
}

/// Binds `init` to a `const` temporary and returns the accessor expressions
/// for each sub-pattern of an array or object pattern.
fn split_composite<'a>(
    pattern: &'a AstNode,
    init: Expr,
    scope: &Scope,
    out: &mut Vec<Stmt>,
) -> Option<Vec<(&'a AstNode, Expr)>> {
    let parts: Vec<(&'a AstNode, Expr)> = match &pattern.kind {
        AstNodeKind::Array { elements } => {
            let temp = scope.new_id("__dest__");
            let parts = elements
                .iter()
                .enumerate()
                .map(|(i, element)| {
                    let get = Expr::call(
                        GET_INDEX,
                        vec![Expr::ident(&temp), Expr::Num(i as f64), Expr::pos(element.get_location())],
                    );
                    (element, get)
                })
                .collect();
            out.push(Stmt::decl(DeclKind::Const, temp, init));
            parts
        }
        AstNodeKind::Object { entries } => {
            let temp = scope.new_id("__dest__");
            let parts = entries
                .iter()
                .map(|(key, value)| {
                    let get = Expr::call(
                        GET_PROP,
                        vec![Expr::ident(&temp), Expr::Str(key.clone()), Expr::pos(value.get_location())],
                    );
                    (value, get)
                })
                .collect();
            out.push(Stmt::decl(DeclKind::Const, temp, init));
            parts
        }
        _ => return None,
    };
    Some(parts)
}

/// Lowers `let`/`var` patterns: every leaf identifier becomes a new binding
/// in `scope` with the given mutability.
pub fn define_dest(
    pattern: &AstNode,
    init: Expr,
    scope: &Rc<Scope>,
    mutable: bool,
    out: &mut Vec<Stmt>,
) -> Result<(), LowerError> {
    if let AstNodeKind::Identifier { name } = &pattern.kind {
        let target = scope.define(name, mutable);
        let kind = if mutable && scope.namespace_name().is_none() {
            DeclKind::Let
        } else {
            DeclKind::Const
        };
        out.push(Stmt::decl(kind, target, init));
        return Ok(());
    }

    let parts = split_composite(pattern, init, scope, out)
        .ok_or_else(|| invalid_destination(pattern, "aisc.lower.dest.define_dest"))?;
    for (sub_pattern, get) in parts {
        define_dest(sub_pattern, get, scope, mutable, out)?;
    }
    Ok(())
}

/// Lowers `=` targets. Unbound and immutable identifiers compile to a
/// runtime `internal_error` at the assignment site.
pub fn assign_dest<'a>(
    pattern: &'a AstNode,
    value: Expr,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<(), LowerError> {
    let location = pattern.get_location();
    match &pattern.kind {
        AstNodeKind::Identifier { name } => {
            match scope.lookup(name) {
                Some(entry) if entry.mutable => out.push(Stmt::Assign {
                    name: entry.target_name,
                    op: AssignOp::Assign,
                    value,
                }),
                found => {
                    // The value is still evaluated before the failure is raised.
                    if value.to_ref().is_none() {
                        out.push(Stmt::Expr(value));
                    }
                    let code = match found {
                        Some(_) => ErrorCode::ImmutableVariable,
                        None => ErrorCode::NotDefined,
                    };
                    out.push(Stmt::Expr(internal_error(code, name, location)));
                }
            }
            Ok(())
        }
        AstNodeKind::Index { object, index } => {
            let value = bind_ref(value, scope, out);
            let target = lower_ref(object, scope, ctx, out)?;
            let index = lower_expression(index, scope, ctx, out)?;
            out.push(Stmt::Expr(Expr::call(
                SET_INDEX,
                vec![target.into(), index, value.into(), Expr::pos(location)],
            )));
            Ok(())
        }
        AstNodeKind::Member { object, property } => {
            let value = bind_ref(value, scope, out);
            let target = lower_ref(object, scope, ctx, out)?;
            out.push(Stmt::Expr(Expr::call(
                SET_PROP,
                vec![target.into(), Expr::Str(property.clone()), value.into(), Expr::pos(location)],
            )));
            Ok(())
        }
        _ => {
            let parts = split_composite(pattern, value, scope, out)
                .ok_or_else(|| invalid_destination(pattern, "aisc.lower.dest.assign_dest"))?;
            for (sub_pattern, get) in parts {
                assign_dest(sub_pattern, get, scope, ctx, out)?;
            }
            Ok(())
        }
    }
}
