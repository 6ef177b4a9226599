//! file: core/src/vm/value.rs
//! description: dynamic values of running programs.
//!
//! Arrays, maps, functions and error values are shared by reference, the
//! way the target runtime shares objects: cloning a `Value` clones the
//! handle, not the contents.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::js::{Function, TypeTag};

use super::err::RuntimeError;
use super::exec::{Env, Interpreter};

pub type NativeFn = Rc<dyn Fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>>;

pub enum Callable {
    Native { name: String, func: NativeFn },
    Closure { function: Rc<Function>, env: Rc<Env> },
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native { name, .. } => write!(f, "Native({})", name),
            Callable::Closure { function, .. } => write!(f, "Closure({} params)", function.params.len()),
        }
    }
}

#[derive(Debug)]
pub struct ErrorValue {
    pub name: String,
    pub info: Value,
}

/// Insertion-ordered string map backing object values.
#[derive(Debug, Default)]
pub struct ObjectMap {
    entries: IndexMap<String, Value>,
}

impl ObjectMap {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Overwriting a key keeps its original position.
    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Arr(Rc<RefCell<Vec<Value>>>),
    Obj(Rc<RefCell<ObjectMap>>),
    Fn(Rc<Callable>),
    Error(Rc<ErrorValue>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Arr(Rc::new(RefCell::new(items)))
    }

    pub fn object<'k>(entries: impl IntoIterator<Item = (&'k str, Value)>) -> Self {
        let mut map = ObjectMap::default();
        for (key, value) in entries {
            map.set(key, value);
        }
        Value::Obj(Rc::new(RefCell::new(map)))
    }

    pub fn native(
        name: &str,
        func: impl Fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Value::Fn(Rc::new(Callable::Native { name: name.to_string(), func: Rc::new(func) }))
    }

    pub fn error(name: impl Into<String>, info: Value) -> Self {
        Value::Error(Rc::new(ErrorValue { name: name.into(), info }))
    }

    /// Type name as reported by `Core:type`.
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Num(_) => "num",
            Value::Str(_) => "str",
            Value::Arr(_) => "arr",
            Value::Obj(_) => "obj",
            Value::Fn(_) => "fn",
            Value::Error(_) => "error",
        }
    }

    pub fn has_tag(&self, tag: TypeTag) -> bool {
        matches!(
            (tag, self),
            (TypeTag::Boolean, Value::Bool(_))
                | (TypeTag::Number, Value::Num(_))
                | (TypeTag::String, Value::Str(_))
                | (TypeTag::Array, Value::Arr(_))
                | (TypeTag::Object, Value::Obj(_))
                | (TypeTag::Function, Value::Fn(_))
        )
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Num(n) => *n != 0.0 && !n.is_nan(),
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// `===`: primitives compare by value, everything else by identity.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Arr(a), Value::Arr(b)) => Rc::ptr_eq(a, b),
            (Value::Obj(a), Value::Obj(b)) => Rc::ptr_eq(a, b),
            (Value::Fn(a), Value::Fn(b)) => Rc::ptr_eq(a, b),
            (Value::Error(a), Value::Error(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Identity of a reference value, used for cycle detection.
    pub(crate) fn identity(&self) -> Option<*const ()> {
        match self {
            Value::Arr(a) => Some(Rc::as_ptr(a) as *const ()),
            Value::Obj(o) => Some(Rc::as_ptr(o) as *const ()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_eq(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::runtime::repr(self))
    }
}
