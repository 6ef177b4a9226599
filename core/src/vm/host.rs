//! file: core/src/vm/host.rs
//! description: host bindings available to scripts run by the CLI.
//!
//! `preset` returns `(source name, value)` pairs. The source names are the
//! ones scripts use (`Core:type`); `VM::with_host` maps them onto the target
//! names the global scope allocated for them.
//!
use chrono::{Datelike, Local, Utc};

use super::err::{RuntimeError, RuntimeErrorKind};
use super::runtime::repr;
use super::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).cloned().unwrap_or(Value::Null)
}

fn expect_num(value: &Value, what: &str) -> Result<f64, RuntimeError> {
    value.as_num().ok_or_else(|| {
        RuntimeError::new(
            RuntimeErrorKind::TypeMismatch(crate::js::TypeTag::Number),
            format!("{}: expected num, got {}", what, value.type_of()),
        )
    })
}

/// Source names of every binding in `preset`.
pub const PRESET_NAMES: &[&str] = &[
    "print",
    "Core:type",
    "Core:to_str",
    "Core:range",
    "Core:abort",
    "Error:create",
    "Date:now",
    "Date:year",
];

pub fn preset() -> Vec<(&'static str, Value)> {
    vec![
        (
            "print",
            Value::native("print", |_, args| {
                println!("{}", repr(&arg(&args, 0)));
                Ok(Value::Null)
            }),
        ),
        ("Core:type", Value::native("Core:type", |_, args| Ok(Value::str(arg(&args, 0).type_of())))),
        ("Core:to_str", Value::native("Core:to_str", |_, args| Ok(Value::str(repr(&arg(&args, 0)))))),
        (
            "Core:range",
            Value::native("Core:range", |_, args| {
                let a = expect_num(&arg(&args, 0), "Core:range")?.floor() as i64;
                let b = expect_num(&arg(&args, 1), "Core:range")?.floor() as i64;
                let items: Vec<Value> = if a <= b {
                    (a..=b).map(|n| Value::Num(n as f64)).collect()
                } else {
                    (b..=a).rev().map(|n| Value::Num(n as f64)).collect()
                };
                Ok(Value::array(items))
            }),
        ),
        (
            "Core:abort",
            Value::native("Core:abort", |_, args| {
                Err(RuntimeError::new(RuntimeErrorKind::Abort, repr(&arg(&args, 0))))
            }),
        ),
        (
            "Error:create",
            Value::native("Error:create", |_, args| {
                let name = repr(&arg(&args, 0));
                Ok(Value::error(name, arg(&args, 1)))
            }),
        ),
        ("Date:now", Value::native("Date:now", |_, _| Ok(Value::Num(Utc::now().timestamp_millis() as f64)))),
        ("Date:year", Value::native("Date:year", |_, _| Ok(Value::Num(Local::now().year() as f64)))),
    ]
}
