//! file: core/src/js/ast.rs
//! description: statement-oriented target AST.
//!
//! Nodes are plain owned values. The only sharing is `DeferredBody`, which
//! is allocated when a function literal is lowered and filled in later by
//! the deferred queue.
use std::cell::{Ref as CellRef, RefCell};
use std::rc::Rc;

use crate::location::Location;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Const,
    Let,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Pow,      // **
    Mul,      // *
    Div,      // /
    Rem,      // %
    Add,      // +
    Sub,      // -
    Lt,       // <
    Le,       // <=
    Gt,       // >
    Ge,       // >=
    StrictEq, // ===
    StrictNe, // !==
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Pow => "**",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNe => "!==",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
        }
    }
}

/// An expression that can be evaluated any number of times without side
/// effects: an identifier, `null` or a boolean constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ref {
    Ident(String),
    Null,
    Bool(bool),
}

impl From<Ref> for Expr {
    fn from(r: Ref) -> Self {
        match r {
            Ref::Ident(name) => Expr::Ident(name),
            Ref::Null => Expr::Null,
            Ref::Bool(value) => Expr::Bool(value),
        }
    }
}

/// Statement list of a function body, shared between the function
/// expression and the deferred job that produces it.
#[derive(Debug, Clone, Default)]
pub struct DeferredBody(Rc<RefCell<Vec<Stmt>>>);

impl DeferredBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill(&self, statements: Vec<Stmt>) {
        self.0.borrow_mut().extend(statements);
    }

    pub fn statements(&self) -> CellRef<'_, Vec<Stmt>> {
        self.0.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<String>,
    pub defaults: Vec<Option<Ref>>,
    pub body: DeferredBody,
    pub is_async: bool,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Null,
    Bool(bool),
    Num(f64),
    Str(String),
    Ident(String),
    Array(Vec<Expr>),
    /// `new Map([[key, value], ...])`
    Map(Vec<(String, Expr)>),
    Unary { op: UnaryOp, arg: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    Call { callee: Box<Expr>, args: Vec<Expr> },
    Await(Box<Expr>),
    Function(Rc<Function>),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Call of a free function by name, e.g. a runtime primitive.
    pub fn call(name: &str, args: Vec<Expr>) -> Self {
        Expr::Call { callee: Box::new(Expr::ident(name)), args }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    /// `[line, column]` literal passed to runtime primitives for diagnostics.
    pub fn pos(location: Option<&Location>) -> Self {
        let (line, column) = location.map(Location::target_pos).unwrap_or((0, 0));
        Expr::Array(vec![Expr::Num(line as f64), Expr::Num(column as f64)])
    }

    /// The `Ref` form of this expression, if it already is one.
    pub fn to_ref(&self) -> Option<Ref> {
        match self {
            Expr::Ident(name) => Some(Ref::Ident(name.clone())),
            Expr::Null => Some(Ref::Null),
            Expr::Bool(value) => Some(Ref::Bool(*value)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Decl { kind: DeclKind, name: String, init: Expr },
    Expr(Expr),
    Assign { name: String, op: AssignOp, value: Expr },
    If { test: Expr, consequent: Vec<Stmt>, alternate: Option<Vec<Stmt>> },
    While { test: Expr, body: Vec<Stmt> },
    /// `for (let counter = init; test; counter++) { body }`
    For { counter: String, init: Expr, test: Expr, body: Vec<Stmt> },
    /// `for (const binding of iterable) { body }`
    ForOf { binding: String, iterable: Expr, body: Vec<Stmt> },
    Return(Expr),
    Break,
    Continue,
}

impl Stmt {
    pub fn decl(kind: DeclKind, name: impl Into<String>, init: Expr) -> Self {
        Stmt::Decl { kind, name: name.into(), init }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub body: Vec<Stmt>,
}
