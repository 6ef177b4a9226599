//! file: core/src/lower/lower_stmt.rs
//! description: statement lowering and block value threading.
//!
//! Statements yield `Some(expr)` when they have a value in expression
//! position and `None` otherwise. `lower_statement_list` turns the value of
//! the last statement into the value of the whole list.
use std::rc::Rc;

use log::trace;

use crate::ast::{AssignOperator, AstNode, AstNodeKind};
use crate::js::primitives::{GET_INDEX, GET_PROP, SET_INDEX, SET_PROP};
use crate::js::{AssignOp, BinaryOp, DeclKind, ErrorCode, Expr, Ref, Stmt, TypeTag};

use super::err::{LowerError, LowerErrorKind};
use super::lower_dest::{assign_dest, define_dest};
use super::lower_expr::{bind_ref, lower_expression, lower_ref};
use super::lowering_context::LoweringContext;
use super::scope::Scope;
use super::utils::{assertion, discard, internal_error};

/// Lowers `stmts` in order and returns the identifier holding the value of
/// the last one, if it has a value.
pub fn lower_statement_list<'a>(
    stmts: &'a [AstNode],
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Option<Expr>, LowerError> {
    let Some((last, init)) = stmts.split_last() else {
        return Ok(None);
    };
    for stmt in init {
        let value = lower_statement(stmt, scope, ctx, out)?;
        discard(out, value);
    }
    match lower_statement(last, scope, ctx, out)? {
        Some(value) => {
            let result = scope.new_id("__run_result__");
            out.push(Stmt::decl(DeclKind::Const, result.clone(), value));
            Ok(Some(Expr::Ident(result)))
        }
        None => Ok(None),
    }
}

pub fn lower_statement<'a>(
    node: &'a AstNode,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Option<Expr>, LowerError> {
    trace!("lowering statement {}", node);
    match &node.kind {
        AstNodeKind::Definition { dest, expr, mutable } => {
            let init = match expr {
                Some(expr) => lower_expression(expr, scope, ctx, out)?,
                None => Expr::Null,
            };
            define_dest(dest, init, scope, *mutable, out)?;
        }
        AstNodeKind::Assignment { op, dest, expr } => {
            let value = lower_expression(expr, scope, ctx, out)?;
            match op {
                AssignOperator::Assign => assign_dest(dest, value, scope, ctx, out)?,
                AssignOperator::AddAssign => {
                    lower_compound(BinaryOp::Add, dest, expr, value, scope, ctx, out)?
                }
                AssignOperator::SubAssign => {
                    lower_compound(BinaryOp::Sub, dest, expr, value, scope, ctx, out)?
                }
            }
        }
        AstNodeKind::Return { expr } => {
            let value = lower_expression(expr, scope, ctx, out)?;
            out.push(Stmt::Return(value));
        }
        AstNodeKind::Each { var, items, body } => {
            let items_ref = lower_ref(items, scope, ctx, out)?;
            out.push(assertion(TypeTag::Array, &items_ref, items.get_location()));

            let element = scope.new_id("__each_element__");
            let each_scope = scope.child();
            let mut block = Vec::new();
            define_dest(var, Expr::Ident(element.clone()), &each_scope, false, &mut block)?;
            let value = lower_statement(body, &each_scope, ctx, &mut block)?;
            discard(&mut block, value);

            out.push(Stmt::ForOf { binding: element, iterable: items_ref.into(), body: block });
        }
        AstNodeKind::ForTimes { times, body } => {
            let times_ref = lower_ref(times, scope, ctx, out)?;
            out.push(assertion(TypeTag::Number, &times_ref, times.get_location()));

            let counter = scope.new_id("__for_index__");
            let mut block = Vec::new();
            let value = lower_statement(body, scope, ctx, &mut block)?;
            discard(&mut block, value);

            out.push(Stmt::For {
                counter: counter.clone(),
                init: Expr::Num(0.0),
                test: Expr::binary(BinaryOp::Lt, Expr::Ident(counter), times_ref.into()),
                body: block,
            });
        }
        AstNodeKind::ForRange { var, from, to, body } => {
            let from_ref = lower_ref(from, scope, ctx, out)?;
            let to_ref = lower_ref(to, scope, ctx, out)?;
            out.push(assertion(TypeTag::Number, &from_ref, from.get_location()));
            out.push(assertion(TypeTag::Number, &to_ref, to.get_location()));

            // `to` is an iteration count, not an upper bound.
            let for_scope = scope.child();
            let counter = for_scope.define(var, false);
            let mut block = Vec::new();
            let value = lower_statement(body, &for_scope, ctx, &mut block)?;
            discard(&mut block, value);

            out.push(Stmt::For {
                counter: counter.clone(),
                init: from_ref.clone().into(),
                test: Expr::binary(
                    BinaryOp::Lt,
                    Expr::Ident(counter),
                    Expr::binary(BinaryOp::Add, from_ref.into(), to_ref.into()),
                ),
                body: block,
            });
        }
        AstNodeKind::Loop { statements } => {
            let mut block = Vec::new();
            let value = lower_statement_list(statements, &scope.child(), ctx, &mut block)?;
            discard(&mut block, value);
            out.push(Stmt::While { test: Expr::Bool(true), body: block });
        }
        AstNodeKind::Break => out.push(Stmt::Break),
        AstNodeKind::Continue => out.push(Stmt::Continue),
        AstNodeKind::Namespace { .. } | AstNodeKind::Meta { .. } => {
            return Err(LowerError::new(
                LowerErrorKind::Misplaced,
                format!("{} is only allowed at the top level.", node.kind),
                "aisc.lower.stmt.lower_statement",
                node.get_location().cloned(),
            ));
        }
        _ => return lower_expression(node, scope, ctx, out).map(Some),
    }
    Ok(None)
}

/// `+=` / `-=`. The right-hand side has already been lowered into `value`;
/// the current value of the target is read, checked and written back.
fn lower_compound<'a>(
    op: BinaryOp,
    dest: &'a AstNode,
    rhs_node: &'a AstNode,
    value: Expr,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<(), LowerError> {
    let location = dest.get_location();
    let rhs = bind_ref(value, scope, out);
    let assign_op = match op {
        BinaryOp::Sub => AssignOp::SubAssign,
        _ => AssignOp::AddAssign,
    };

    match &dest.kind {
        AstNodeKind::Identifier { name } => match scope.lookup(name) {
            Some(entry) if entry.mutable => {
                let current = Ref::Ident(entry.target_name.clone());
                out.push(assertion(TypeTag::Number, &current, location));
                out.push(assertion(TypeTag::Number, &rhs, rhs_node.get_location()));
                out.push(Stmt::Assign { name: entry.target_name, op: assign_op, value: rhs.into() });
            }
            Some(_) => out.push(Stmt::Expr(internal_error(ErrorCode::ImmutableVariable, name, location))),
            None => out.push(Stmt::Expr(internal_error(ErrorCode::NotDefined, name, location))),
        },
        AstNodeKind::Index { object, index } => {
            let target = lower_ref(object, scope, ctx, out)?;
            let index = lower_ref(index, scope, ctx, out)?;
            let current = bind_ref(
                Expr::call(GET_INDEX, vec![target.clone().into(), index.clone().into(), Expr::pos(location)]),
                scope,
                out,
            );
            out.push(assertion(TypeTag::Number, &current, location));
            out.push(assertion(TypeTag::Number, &rhs, rhs_node.get_location()));
            out.push(Stmt::Expr(Expr::call(
                SET_INDEX,
                vec![
                    target.into(),
                    index.into(),
                    Expr::binary(op, current.into(), rhs.into()),
                    Expr::pos(location),
                ],
            )));
        }
        AstNodeKind::Member { object, property } => {
            let target = lower_ref(object, scope, ctx, out)?;
            let current = bind_ref(
                Expr::call(
                    GET_PROP,
                    vec![target.clone().into(), Expr::Str(property.clone()), Expr::pos(location)],
                ),
                scope,
                out,
            );
            out.push(assertion(TypeTag::Number, &current, location));
            out.push(assertion(TypeTag::Number, &rhs, rhs_node.get_location()));
            out.push(Stmt::Expr(Expr::call(
                SET_PROP,
                vec![
                    target.into(),
                    Expr::Str(property.clone()),
                    Expr::binary(op, current.into(), rhs.into()),
                    Expr::pos(location),
                ],
            )));
        }
        AstNodeKind::Array { .. } | AstNodeKind::Object { .. } => {
            // A pattern never holds a number, so this always fails at run time.
            // The leaves are not read.
            let current = bind_ref(Expr::Array(Vec::new()), scope, out);
            out.push(assertion(TypeTag::Number, &current, location));
        }
        _ => {
            return Err(LowerError::new(
                LowerErrorKind::InvalidDestination,
                format!("{} is not a valid destination.", dest.kind),
                "aisc.lower.stmt.lower_compound",
                location.cloned(),
            ));
        }
    }
    Ok(())
}
