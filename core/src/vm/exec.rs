//! file: core/src/vm/exec.rs
//! description: tree-walking evaluator for the target AST.
//!
//! Environments form a parent chain of `Rc<Env>` frames, one per block,
//! loop iteration and function call. `await` completes immediately: every
//! call runs to completion before the awaiting expression continues.
//!
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use crate::js::{AssignOp, BinaryOp, DeclKind, Expr, Function, Program, Stmt, UnaryOp};

use super::err::{RuntimeError, RuntimeErrorKind};
use super::runtime::repr;
use super::value::{Callable, Value};

struct Binding {
    value: Value,
    constant: bool,
}

pub struct Env {
    parent: Option<Rc<Env>>,
    vars: RefCell<HashMap<String, Binding>>,
}

impl Env {
    pub fn root() -> Rc<Env> {
        Rc::new(Env { parent: None, vars: RefCell::new(HashMap::new()) })
    }

    pub fn child(self: &Rc<Self>) -> Rc<Env> {
        Rc::new(Env { parent: Some(Rc::clone(self)), vars: RefCell::new(HashMap::new()) })
    }

    pub fn declare(&self, name: &str, value: Value, constant: bool) {
        self.vars.borrow_mut().insert(name.to_string(), Binding { value, constant });
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.vars.borrow().get(name) {
            return Some(binding.value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.get(name))
    }

    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        if let Some(binding) = self.vars.borrow_mut().get_mut(name) {
            if binding.constant {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::ConstAssignment,
                    format!("Assignment to constant variable {}.", name),
                ));
            }
            binding.value = value;
            return Ok(());
        }
        match &self.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(not_defined(name)),
        }
    }
}

fn not_defined(name: &str) -> RuntimeError {
    RuntimeError::new(RuntimeErrorKind::ReferenceError, format!("{} is not defined", name))
}

enum Flow {
    Normal,
    Break,
    Continue,
    Return(Value),
}

pub struct Interpreter {
    trace: bool,
    steps: usize,
}

impl Interpreter {
    pub fn new(trace: bool) -> Self {
        Interpreter { trace, steps: 0 }
    }

    /// Number of statements executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Runs a whole program; the result is the operand of a top-level
    /// `return`, or null.
    pub fn run(&mut self, program: &Program, env: &Rc<Env>) -> Result<Value, RuntimeError> {
        match self.exec_block(&program.body, env)? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }

    fn exec_block(&mut self, stmts: &[Stmt], env: &Rc<Env>) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            match self.exec_stmt(stmt, env)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt, env: &Rc<Env>) -> Result<Flow, RuntimeError> {
        self.steps += 1;
        if self.trace {
            trace!("[{}] {}", self.steps, describe(stmt));
        }
        match stmt {
            Stmt::Decl { kind, name, init } => {
                let value = self.eval(init, env)?;
                env.declare(name, value, *kind == DeclKind::Const);
            }
            Stmt::Expr(expr) => {
                self.eval(expr, env)?;
            }
            Stmt::Assign { name, op, value } => {
                let rhs = self.eval(value, env)?;
                let new_value = match op {
                    AssignOp::Assign => rhs,
                    AssignOp::AddAssign => {
                        let current = env.get(name).ok_or_else(|| not_defined(name))?;
                        binary(BinaryOp::Add, &current, &rhs)
                    }
                    AssignOp::SubAssign => {
                        let current = env.get(name).ok_or_else(|| not_defined(name))?;
                        binary(BinaryOp::Sub, &current, &rhs)
                    }
                };
                env.assign(name, new_value)?;
            }
            Stmt::If { test, consequent, alternate } => {
                if self.eval(test, env)?.is_truthy() {
                    return self.exec_block(consequent, &env.child());
                } else if let Some(alternate) = alternate {
                    return self.exec_block(alternate, &env.child());
                }
            }
            Stmt::While { test, body } => {
                while self.eval(test, env)?.is_truthy() {
                    match self.exec_block(body, &env.child())? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
            }
            Stmt::For { counter, init, test, body } => {
                // Each iteration gets its own copy of the counter, so closures
                // created in the body keep the value of their iteration.
                let mut current = self.eval(init, env)?;
                loop {
                    let iteration = env.child();
                    iteration.declare(counter, current.clone(), false);
                    if !self.eval(test, &iteration)?.is_truthy() {
                        break;
                    }
                    match self.exec_block(body, &iteration.child())? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                    let last = iteration.get(counter).unwrap_or(Value::Null);
                    current = binary(BinaryOp::Add, &last, &Value::Num(1.0));
                }
            }
            Stmt::ForOf { binding, iterable, body } => {
                let iterable = self.eval(iterable, env)?;
                let Value::Arr(items) = &iterable else {
                    return Err(RuntimeError::new(
                        RuntimeErrorKind::InvalidTarget,
                        format!("{} is not iterable", iterable.type_of()),
                    ));
                };
                let mut i = 0;
                loop {
                    let item = match items.borrow().get(i) {
                        Some(item) => item.clone(),
                        None => break,
                    };
                    i += 1;
                    let iteration = env.child();
                    iteration.declare(binding, item, true);
                    match self.exec_block(body, &iteration)? {
                        Flow::Break => break,
                        Flow::Return(value) => return Ok(Flow::Return(value)),
                        Flow::Normal | Flow::Continue => {}
                    }
                }
            }
            Stmt::Return(expr) => return Ok(Flow::Return(self.eval(expr, env)?)),
            Stmt::Break => return Ok(Flow::Break),
            Stmt::Continue => return Ok(Flow::Continue),
        }
        Ok(Flow::Normal)
    }

    fn eval(&mut self, expr: &Expr, env: &Rc<Env>) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Null => Ok(Value::Null),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Num(n) => Ok(Value::Num(*n)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Ident(name) => env.get(name).ok_or_else(|| not_defined(name)),
            Expr::Array(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval(item, env)?);
                }
                Ok(Value::array(values))
            }
            Expr::Map(entries) => {
                let mut values = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    values.push((key.as_str(), self.eval(value, env)?));
                }
                Ok(Value::object(values))
            }
            Expr::Unary { op, arg } => {
                let value = self.eval(arg, env)?;
                Ok(match op {
                    UnaryOp::Not => Value::Bool(!value.is_truthy()),
                    UnaryOp::Plus => Value::Num(value.as_num().unwrap_or(f64::NAN)),
                    UnaryOp::Minus => Value::Num(-value.as_num().unwrap_or(f64::NAN)),
                })
            }
            Expr::Binary { op, left, right } => {
                let lhs = self.eval(left, env)?;
                let rhs = self.eval(right, env)?;
                Ok(binary(*op, &lhs, &rhs))
            }
            Expr::Call { callee, args } => {
                let callee = self.eval(callee, env)?;
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval(arg, env)?);
                }
                self.call_value(&callee, values)
            }
            Expr::Await(inner) => self.eval(inner, env),
            Expr::Function(function) => Ok(Value::Fn(Rc::new(Callable::Closure {
                function: Rc::clone(function),
                env: Rc::clone(env),
            }))),
        }
    }

    /// Invokes a function value with already evaluated arguments.
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let Value::Fn(callable) = callee else {
            return Err(RuntimeError::new(
                RuntimeErrorKind::InvalidTarget,
                format!("{} is not a function", callee.type_of()),
            ));
        };
        match callable.as_ref() {
            Callable::Native { func, .. } => func(self, args),
            Callable::Closure { function, env } => self.call_closure(function, env, args),
        }
    }

    fn call_closure(
        &mut self,
        function: &Function,
        env: &Rc<Env>,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let frame = env.child();
        let mut args = args.into_iter();
        for (name, default) in function.params.iter().zip(&function.defaults) {
            let value = match (args.next(), default) {
                (Some(value), _) => value,
                (None, Some(default)) => self.eval(&Expr::from(default.clone()), &frame)?,
                (None, None) => Value::Null,
            };
            frame.declare(name, value, false);
        }
        let body = function.body.statements();
        match self.exec_block(&body, &frame)? {
            Flow::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }
}

/// Operators on already type-checked operands. `+` concatenates as soon as
/// one side is a string; anything else that is not numeric yields `NaN`.
fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Value {
    match op {
        BinaryOp::StrictEq => return Value::Bool(lhs.strict_eq(rhs)),
        BinaryOp::StrictNe => return Value::Bool(!lhs.strict_eq(rhs)),
        BinaryOp::Add => {
            if let (Value::Num(a), Value::Num(b)) = (lhs, rhs) {
                return Value::Num(a + b);
            }
            if matches!(lhs, Value::Str(_)) || matches!(rhs, Value::Str(_)) {
                return Value::Str(format!("{}{}", repr(lhs), repr(rhs)));
            }
            return Value::Num(f64::NAN);
        }
        _ => {}
    }

    if let (Value::Str(a), Value::Str(b)) = (lhs, rhs) {
        let ordering = a.cmp(b);
        return match op {
            BinaryOp::Lt => Value::Bool(ordering.is_lt()),
            BinaryOp::Le => Value::Bool(ordering.is_le()),
            BinaryOp::Gt => Value::Bool(ordering.is_gt()),
            BinaryOp::Ge => Value::Bool(ordering.is_ge()),
            _ => Value::Num(f64::NAN),
        };
    }

    let a = lhs.as_num().unwrap_or(f64::NAN);
    let b = rhs.as_num().unwrap_or(f64::NAN);
    match op {
        BinaryOp::Pow => Value::Num(a.powf(b)),
        BinaryOp::Mul => Value::Num(a * b),
        BinaryOp::Div => Value::Num(a / b),
        BinaryOp::Rem => Value::Num(a % b),
        BinaryOp::Sub => Value::Num(a - b),
        BinaryOp::Lt => Value::Bool(a < b),
        BinaryOp::Le => Value::Bool(a <= b),
        BinaryOp::Gt => Value::Bool(a > b),
        BinaryOp::Ge => Value::Bool(a >= b),
        BinaryOp::Add | BinaryOp::StrictEq | BinaryOp::StrictNe => Value::Null,
    }
}

fn describe(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Decl { kind, name, .. } => format!("{:?} {}", kind, name),
        Stmt::Expr(expr) => format!("expr {}", expr),
        Stmt::Assign { name, op, .. } => format!("{} {} ...", name, op.as_str()),
        Stmt::If { .. } => "if".to_string(),
        Stmt::While { .. } => "while".to_string(),
        Stmt::For { counter, .. } => format!("for {}", counter),
        Stmt::ForOf { binding, .. } => format!("for {} of", binding),
        Stmt::Return(_) => "return".to_string(),
        Stmt::Break => "break".to_string(),
        Stmt::Continue => "continue".to_string(),
    }
}
