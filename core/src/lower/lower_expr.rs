//! file: core/src/lower/lower_expr.rs
//! description: expression lowering.
//!
//! Each function takes an expression node, appends whatever preparatory
//! statements it needs to `out` and returns the expression that holds the
//! value. `lower_ref` additionally guarantees the result can be read more
//! than once without repeating side effects.
use std::rc::Rc;

use log::trace;

use crate::ast::{AstNode, AstNodeKind, BinaryOperator, Param, UnaryOperator};
use crate::js::primitives::{CALL, GET_INDEX, GET_PROP, REPR};
use crate::js::{
    AssignOp, BinaryOp, DeclKind, DeferredBody, ErrorCode, Expr, Function, Ref, Stmt, TypeTag,
    UnaryOp,
};

use super::err::{LowerError, LowerErrorKind};
use super::lower_dest::define_dest;
use super::lower_stmt::{lower_statement, lower_statement_list};
use super::lowering_context::LoweringContext;
use super::scope::Scope;
use super::utils::{assertion, assign_tail, internal_error};

/// Lowers `node` and binds the result to a fresh `const` unless it is
/// already an identifier, `null` or a boolean.
pub fn lower_ref<'a>(
    node: &'a AstNode,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Ref, LowerError> {
    let expr = lower_expression(node, scope, ctx, out)?;
    Ok(bind_ref(expr, scope, out))
}

pub(crate) fn bind_ref(expr: Expr, scope: &Scope, out: &mut Vec<Stmt>) -> Ref {
    if let Some(r) = expr.to_ref() {
        return r;
    }
    let name = scope.new_id("__ref__");
    out.push(Stmt::decl(DeclKind::Const, name.clone(), expr));
    Ref::Ident(name)
}

pub fn lower_expression<'a>(
    node: &'a AstNode,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Expr, LowerError> {
    trace!("lowering expression {}", node);
    let location = node.get_location();
    match &node.kind {
        AstNodeKind::Null => Ok(Expr::Null),
        AstNodeKind::Bool { value } => Ok(Expr::Bool(*value)),
        AstNodeKind::Number { value } => Ok(Expr::Num(*value)),
        AstNodeKind::String { value } => Ok(Expr::Str(value.clone())),
        AstNodeKind::Template { parts } => lower_template(parts, scope, ctx, out),
        AstNodeKind::Array { elements } => {
            let mut items = Vec::with_capacity(elements.len());
            for element in elements {
                items.push(lower_ref(element, scope, ctx, out)?.into());
            }
            Ok(Expr::Array(items))
        }
        AstNodeKind::Object { entries } => {
            let mut fields = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                fields.push((key.clone(), lower_ref(value, scope, ctx, out)?.into()));
            }
            Ok(Expr::Map(fields))
        }

        AstNodeKind::If { cond, then, elifs, else_ } => {
            lower_if(cond, then, elifs, else_.as_deref(), scope, ctx, out)
        }
        AstNodeKind::Match { .. } => Err(LowerError::new(
            LowerErrorKind::UnsupportedConstruct,
            "`match` expressions are not supported yet.".into(),
            "aisc.lower.expr.lower_expression",
            location.cloned(),
        )),
        AstNodeKind::Block { statements } => {
            let value = lower_statement_list(statements, &scope.child(), ctx, out)?;
            Ok(value.unwrap_or(Expr::Null))
        }
        AstNodeKind::Function { params, body } => lower_function(params, body, scope, ctx, out),
        AstNodeKind::Call { callee, args } => {
            let callee = lower_ref(callee, scope, ctx, out)?;
            let mut lowered = Vec::with_capacity(args.len());
            for arg in args {
                lowered.push(lower_ref(arg, scope, ctx, out)?.into());
            }
            Ok(Expr::Await(Box::new(Expr::call(
                CALL,
                vec![callee.into(), Expr::Array(lowered), Expr::pos(location)],
            ))))
        }

        // Answered from the compiler's static view of the scope chain.
        AstNodeKind::Exists { name } => Ok(Expr::Bool(scope.exists(name))),
        AstNodeKind::Identifier { name } => match scope.lookup(name) {
            Some(entry) => Ok(Expr::Ident(entry.target_name)),
            None => Ok(internal_error(ErrorCode::NotDefined, name, location)),
        },
        AstNodeKind::UnaryOp { op, expr } => {
            let operand = lower_ref(expr, scope, ctx, out)?;
            let (tag, op) = match op {
                UnaryOperator::Plus => (TypeTag::Number, UnaryOp::Plus),
                UnaryOperator::Minus => (TypeTag::Number, UnaryOp::Minus),
                UnaryOperator::Not => (TypeTag::Boolean, UnaryOp::Not),
            };
            out.push(assertion(tag, &operand, expr.get_location()));
            Ok(Expr::Unary { op, arg: Box::new(operand.into()) })
        }
        AstNodeKind::BinaryOp { left, op, right } => {
            let Some(js_op) = binary_op(*op) else {
                return lower_logical(*op, left, right, scope, ctx, out);
            };
            let lhs = lower_ref(left, scope, ctx, out)?;
            let rhs = lower_ref(right, scope, ctx, out)?;
            if op.is_numeric() {
                out.push(assertion(TypeTag::Number, &lhs, left.get_location()));
                out.push(assertion(TypeTag::Number, &rhs, right.get_location()));
            }
            Ok(Expr::binary(js_op, lhs.into(), rhs.into()))
        }
        AstNodeKind::Index { object, index } => {
            let target = lower_ref(object, scope, ctx, out)?;
            let index = lower_expression(index, scope, ctx, out)?;
            Ok(Expr::call(GET_INDEX, vec![target.into(), index, Expr::pos(location)]))
        }
        AstNodeKind::Member { object, property } => {
            let target = lower_expression(object, scope, ctx, out)?;
            Ok(Expr::call(
                GET_PROP,
                vec![target, Expr::Str(property.clone()), Expr::pos(location)],
            ))
        }

        _ => Err(LowerError::new(
            LowerErrorKind::Misplaced,
            format!("{} cannot be used as an expression.", node.kind),
            "aisc.lower.expr.lower_expression",
            location.cloned(),
        )),
    }
}

/// `None` for the short-circuiting operators, which have no direct counterpart.
fn binary_op(op: BinaryOperator) -> Option<BinaryOp> {
    let op = match op {
        BinaryOperator::Pow => BinaryOp::Pow,
        BinaryOperator::Mul => BinaryOp::Mul,
        BinaryOperator::Div => BinaryOp::Div,
        BinaryOperator::Rem => BinaryOp::Rem,
        BinaryOperator::Add => BinaryOp::Add,
        BinaryOperator::Sub => BinaryOp::Sub,
        BinaryOperator::Lt => BinaryOp::Lt,
        BinaryOperator::Le => BinaryOp::Le,
        BinaryOperator::Gt => BinaryOp::Gt,
        BinaryOperator::Ge => BinaryOp::Ge,
        BinaryOperator::Eq => BinaryOp::StrictEq,
        BinaryOperator::Ne => BinaryOp::StrictNe,
        BinaryOperator::And | BinaryOperator::Or => return None,
    };
    Some(op)
}

fn lower_template<'a>(
    parts: &'a [AstNode],
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Expr, LowerError> {
    let acc = scope.new_id("__tmpl__");
    out.push(Stmt::decl(DeclKind::Let, acc.clone(), Expr::Str(String::new())));
    for part in parts {
        let value = lower_expression(part, scope, ctx, out)?;
        out.push(Stmt::Assign {
            name: acc.clone(),
            op: AssignOp::AddAssign,
            value: Expr::call(REPR, vec![value]),
        });
    }
    Ok(Expr::Ident(acc))
}

/// `a && b` / `a || b` with a boolean assertion on every operand that is
/// actually evaluated.
fn lower_logical<'a>(
    op: BinaryOperator,
    left: &'a AstNode,
    right: &'a AstNode,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Expr, LowerError> {
    let is_or = op == BinaryOperator::Or;
    let result = scope.new_id(if is_or { "__or_result__" } else { "__and_result__" });
    let result_ref = Ref::Ident(result.clone());

    let lhs = lower_expression(left, scope, ctx, out)?;
    out.push(Stmt::decl(DeclKind::Let, result.clone(), lhs));
    out.push(assertion(TypeTag::Boolean, &result_ref, left.get_location()));

    let mut branch = Vec::new();
    let rhs = lower_expression(right, scope, ctx, &mut branch)?;
    assign_tail(&mut branch, &result, Some(rhs));
    branch.push(assertion(TypeTag::Boolean, &result_ref, right.get_location()));

    let test = if is_or {
        Expr::Unary { op: UnaryOp::Not, arg: Box::new(Expr::Ident(result.clone())) }
    } else {
        Expr::Ident(result.clone())
    };
    out.push(Stmt::If { test, consequent: branch, alternate: None });
    Ok(Expr::Ident(result))
}

/// `elif` arms are folded right to left: each one becomes the whole
/// alternate of the arm before it.
fn lower_if<'a>(
    cond: &'a AstNode,
    then: &'a AstNode,
    elifs: &'a [(AstNode, AstNode)],
    else_: Option<&'a AstNode>,
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Expr, LowerError> {
    let test = lower_ref(cond, scope, ctx, out)?;
    out.push(assertion(TypeTag::Boolean, &test, cond.get_location()));

    let result = scope.new_id("__if_result__");
    out.push(Stmt::decl(DeclKind::Let, result.clone(), Expr::Null));

    let mut consequent = Vec::new();
    let value = lower_statement(then, scope, ctx, &mut consequent)?;
    assign_tail(&mut consequent, &result, value);

    let alternate = match elifs.split_first() {
        Some(((elif_cond, elif_then), rest)) => {
            let mut block = Vec::new();
            let value = lower_if(elif_cond, elif_then, rest, else_, scope, ctx, &mut block)?;
            assign_tail(&mut block, &result, Some(value));
            Some(block)
        }
        None => match else_ {
            Some(else_) => {
                let mut block = Vec::new();
                let value = lower_statement(else_, scope, ctx, &mut block)?;
                assign_tail(&mut block, &result, value);
                Some(block)
            }
            None => None,
        },
    };

    out.push(Stmt::If { test: test.into(), consequent, alternate });
    Ok(Expr::Ident(result))
}

/// Emits the function expression now; parameter bindings and the body are
/// produced by a deferred job once the enclosing pass is over.
fn lower_function<'a>(
    params: &'a [Param],
    body: &'a [AstNode],
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<Stmt>,
) -> Result<Expr, LowerError> {
    let fn_scope = scope.child();

    let mut names = Vec::with_capacity(params.len());
    let mut defaults = Vec::with_capacity(params.len());
    for (i, param) in params.iter().enumerate() {
        names.push(fn_scope.new_id(&format!("arg_{}", i)));
        defaults.push(match &param.default {
            Some(default) => Some(lower_ref(default, scope, ctx, out)?),
            None => None,
        });
    }

    let deferred = DeferredBody::new();
    let job_body = deferred.clone();
    let job_names = names.clone();
    ctx.defer(move |ctx| {
        let mut stmts = Vec::new();
        for (param, name) in params.iter().zip(&job_names) {
            define_dest(&param.dest, Expr::Ident(name.clone()), &fn_scope, false, &mut stmts)?;
        }
        let result = lower_statement_list(body, &fn_scope, ctx, &mut stmts)?;
        stmts.push(Stmt::Return(result.unwrap_or(Expr::Null)));
        job_body.fill(stmts);
        Ok(())
    });

    Ok(Expr::Function(Rc::new(Function {
        params: names,
        defaults,
        body: deferred,
        is_async: true,
    })))
}
