use crate::js::primitives::INTERNAL_ERROR;
use crate::js::{Expr, Ref, Stmt};
use crate::js::{ErrorCode, TypeTag};
use crate::location::Location;

/// `assert_<tag>(value, [line, column]);`
pub(crate) fn assertion(tag: TypeTag, value: &Ref, location: Option<&Location>) -> Stmt {
    Stmt::Expr(Expr::call(tag.assert_name(), vec![value.clone().into(), Expr::pos(location)]))
}

/// `internal_error(code, name, [line, column])`
pub(crate) fn internal_error(code: ErrorCode, name: &str, location: Option<&Location>) -> Expr {
    Expr::call(
        INTERNAL_ERROR,
        vec![Expr::Str(code.as_str().to_string()), Expr::Str(name.to_string()), Expr::pos(location)],
    )
}

/// Appends `result = value;` when a branch produced a value.
pub(crate) fn assign_tail(block: &mut Vec<Stmt>, result: &str, value: Option<Expr>) {
    if let Some(value) = value {
        block.push(Stmt::Assign { name: result.to_string(), op: crate::js::AssignOp::Assign, value });
    }
}

/// Keeps a statement-position value only when evaluating it can do something.
pub(crate) fn discard(out: &mut Vec<Stmt>, value: Option<Expr>) {
    if let Some(value) = value {
        if value.to_ref().is_none() {
            out.push(Stmt::Expr(value));
        }
    }
}
