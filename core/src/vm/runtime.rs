//! file: core/src/vm/runtime.rs
//! description: runtime primitives called by generated code.
//!
//! Every name in `js::primitives::RUNTIME_PRIMITIVES` is implemented here
//! and bound into the root environment by `install`. Positions arrive as a
//! `[line, column]` array and are only used for diagnostics.
use std::rc::Rc;

use crate::js::primitives::{CALL, GET_INDEX, GET_PROP, INTERNAL_ERROR, REPR, SET_INDEX, SET_PROP};
use crate::js::{ErrorCode, TypeTag, format_number};

use super::err::{RuntimeError, RuntimeErrorKind};
use super::exec::Env;
use super::value::Value;

type Pos = Option<(usize, usize)>;

/// Decodes the trailing `[line, column]` argument.
fn pos_of(value: Option<&Value>) -> Pos {
    let Some(Value::Arr(items)) = value else {
        return None;
    };
    let items = items.borrow();
    match (items.first(), items.get(1)) {
        (Some(Value::Num(line)), Some(Value::Num(column))) => Some((*line as usize, *column as usize)),
        _ => None,
    }
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Null)
}

pub fn get_prop(target: &Value, name: &str) -> Value {
    match target {
        Value::Obj(map) => map.borrow().get(name).cloned().unwrap_or(Value::Null),
        _ => builtin_property(target, name),
    }
}

fn builtin_property(target: &Value, name: &str) -> Value {
    match (target, name) {
        (Value::Str(s), "len") => Value::Num(s.chars().count() as f64),
        (Value::Arr(items), "len") => Value::Num(items.borrow().len() as f64),
        (Value::Error(err), "name") => Value::Str(err.name.clone()),
        (Value::Error(err), "info") => err.info.clone(),
        _ => Value::Null,
    }
}

pub fn set_prop(target: &Value, name: &str, value: Value, pos: Pos) -> Result<(), RuntimeError> {
    match target {
        Value::Obj(map) => {
            map.borrow_mut().set(name, value);
            Ok(())
        }
        _ => Err(RuntimeError::type_mismatch(TypeTag::Object, pos)),
    }
}

fn checked_index(index: &Value, len: usize, pos: Pos) -> Result<usize, RuntimeError> {
    let n = index.as_num().ok_or_else(|| RuntimeError::type_mismatch(TypeTag::Number, pos))?;
    if n.fract() != 0.0 || n < 0.0 || n >= len as f64 {
        return Err(RuntimeError::new(RuntimeErrorKind::IndexOutOfRange, "Index out of range.").at(pos));
    }
    Ok(n as usize)
}

fn invalid_target(target: &Value, index: &Value, pos: Pos) -> RuntimeError {
    RuntimeError::new(
        RuntimeErrorKind::InvalidTarget,
        format!("Cannot read prop ({}) of {}.", repr_literal(index), target.type_of()),
    )
    .at(pos)
}

pub fn get_index(target: &Value, index: &Value, pos: Pos) -> Result<Value, RuntimeError> {
    match target {
        Value::Arr(items) => {
            let items = items.borrow();
            let i = checked_index(index, items.len(), pos)?;
            Ok(items[i].clone())
        }
        Value::Obj(map) => {
            let key = index.as_str().ok_or_else(|| RuntimeError::type_mismatch(TypeTag::String, pos))?;
            Ok(map.borrow().get(key).cloned().unwrap_or(Value::Null))
        }
        _ => Err(invalid_target(target, index, pos)),
    }
}

pub fn set_index(target: &Value, index: &Value, value: Value, pos: Pos) -> Result<(), RuntimeError> {
    match target {
        Value::Arr(items) => {
            let mut items = items.borrow_mut();
            let i = checked_index(index, items.len(), pos)?;
            items[i] = value;
            Ok(())
        }
        Value::Obj(map) => {
            let key = index.as_str().ok_or_else(|| RuntimeError::type_mismatch(TypeTag::String, pos))?;
            map.borrow_mut().set(key, value);
            Ok(())
        }
        _ => Err(invalid_target(target, index, pos)),
    }
}

pub fn assert_tag(tag: TypeTag, value: &Value, pos: Pos) -> Result<(), RuntimeError> {
    if value.has_tag(tag) {
        Ok(())
    } else {
        Err(RuntimeError::type_mismatch(tag, pos))
    }
}

/// Text form used by string templates and `print`. Strings nested inside
/// arrays and maps are quoted; a reference already printed shows as `...`.
pub fn repr(value: &Value) -> String {
    let mut seen = Vec::new();
    repr_inner(value, false, &mut seen)
}

fn repr_literal(value: &Value) -> String {
    let mut seen = Vec::new();
    repr_inner(value, true, &mut seen)
}

fn repr_inner(value: &Value, literal_like: bool, seen: &mut Vec<*const ()>) -> String {
    if let Some(id) = value.identity() {
        if seen.contains(&id) {
            return "...".to_string();
        }
        seen.push(id);
    }
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Num(n) => format_number(*n),
        Value::Str(s) if literal_like => {
            let mut quoted = String::with_capacity(s.len() + 2);
            quoted.push('"');
            for c in s.chars() {
                if matches!(c, '"' | '\\' | '\r' | '\n') {
                    quoted.push('\\');
                }
                quoted.push(c);
            }
            quoted.push('"');
            quoted
        }
        Value::Str(s) => s.clone(),
        Value::Fn(_) => "@(?) { ? }".to_string(),
        Value::Arr(items) => {
            let parts: Vec<String> =
                items.borrow().iter().map(|item| repr_inner(item, true, seen)).collect();
            format!("[ {} ]", parts.join(", "))
        }
        Value::Obj(map) => {
            let parts: Vec<String> = map
                .borrow()
                .iter()
                .map(|(key, val)| format!("{}: {}", key, repr_inner(val, true, seen)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        Value::Error(_) => "?".to_string(),
    }
}

/// Binds every runtime primitive into `env`.
pub(crate) fn install(env: &Rc<Env>) {
    env.declare(REPR, Value::native(REPR, |_, args| Ok(Value::Str(repr(&arg(&args, 0))))), true);
    env.declare(
        CALL,
        Value::native(CALL, |interp, args| {
            let pos = pos_of(args.get(2));
            let callee = arg(&args, 0);
            assert_tag(TypeTag::Function, &callee, pos)?;
            let call_args = match arg(&args, 1) {
                Value::Arr(items) => {
                    let items = items.borrow().clone();
                    items
                }
                _ => Vec::new(),
            };
            interp.call_value(&callee, call_args)
        }),
        true,
    );
    env.declare(
        GET_PROP,
        Value::native(GET_PROP, |_, args| {
            let name = arg(&args, 1);
            Ok(get_prop(&arg(&args, 0), name.as_str().unwrap_or_default()))
        }),
        true,
    );
    env.declare(
        SET_PROP,
        Value::native(SET_PROP, |_, args| {
            let name = arg(&args, 1);
            set_prop(&arg(&args, 0), name.as_str().unwrap_or_default(), arg(&args, 2), pos_of(args.get(3)))?;
            Ok(Value::Null)
        }),
        true,
    );
    env.declare(
        GET_INDEX,
        Value::native(GET_INDEX, |_, args| get_index(&arg(&args, 0), &arg(&args, 1), pos_of(args.get(2)))),
        true,
    );
    env.declare(
        SET_INDEX,
        Value::native(SET_INDEX, |_, args| {
            set_index(&arg(&args, 0), &arg(&args, 1), arg(&args, 2), pos_of(args.get(3)))?;
            Ok(Value::Null)
        }),
        true,
    );
    env.declare(
        INTERNAL_ERROR,
        Value::native(INTERNAL_ERROR, |_, args| {
            let code = arg(&args, 0);
            let name = arg(&args, 1);
            let pos = pos_of(args.get(2));
            match code.as_str().and_then(ErrorCode::parse) {
                Some(code) => Err(RuntimeError::internal(code, name.as_str().unwrap_or_default(), pos)),
                None => Err(RuntimeError::new(
                    RuntimeErrorKind::Abort,
                    format!("unknown internal error {}", repr_literal(&code)),
                )
                .at(pos)),
            }
        }),
        true,
    );
    for tag in TypeTag::all() {
        env.declare(
            tag.assert_name(),
            Value::native(tag.assert_name(), move |_, args| {
                assert_tag(tag, &arg(&args, 0), pos_of(args.get(1)))?;
                Ok(Value::Null)
            }),
            true,
        );
    }
}
