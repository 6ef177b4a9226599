//! file: core/src/ast/kind.rs
//! description: AST node kind definitions and operator enums.
//!
//! Defines `AstNodeKind` along with `BinaryOperator`, `UnaryOperator` and
//! `AssignOperator`. Destructuring patterns reuse the `Identifier`, `Array`
//! and `Object` kinds, so a pattern is just an expression node whose shape
//! the lowering core validates.
//!
use serde::Serialize;

use super::node::AstNode;

/// Represents binary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOperator {
    Pow, // ^
    Mul, // *
    Div, // /
    Rem, // %
    Add, // +
    Sub, // -
    Lt,  // <
    Le,  // <=
    Gt,  // >
    Ge,  // >=
    Eq,  // ==
    Ne,  // !=
    And, // &&
    Or,  // ||
}

impl BinaryOperator {
    /// `true` for the short-circuiting boolean operators.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }

    /// `true` for operators whose operands must both be numbers.
    pub fn is_numeric(&self) -> bool {
        !self.is_logical() && !matches!(self, BinaryOperator::Eq | BinaryOperator::Ne)
    }
}

/// Represents unary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOperator {
    Plus,  // +
    Minus, // -
    Not,   // !
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOperator {
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
}

/// A function literal parameter: a destructuring pattern plus an optional default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub dest: AstNode,
    pub default: Option<AstNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AstNodeKind {
    Script { body: Vec<AstNode> },
    Namespace { name: String, members: Vec<AstNode> },
    Meta { name: Option<String>, value: Box<AstNode> },

    Definition { dest: Box<AstNode>, expr: Option<Box<AstNode>>, mutable: bool },
    Assignment { op: AssignOperator, dest: Box<AstNode>, expr: Box<AstNode> },
    Return { expr: Box<AstNode> },
    Each { var: Box<AstNode>, items: Box<AstNode>, body: Box<AstNode> },
    ForTimes { times: Box<AstNode>, body: Box<AstNode> },
    ForRange { var: String, from: Box<AstNode>, to: Box<AstNode>, body: Box<AstNode> },
    Loop { statements: Vec<AstNode> },
    Break,
    Continue,

    Null,
    Bool { value: bool },
    Number { value: f64 },
    String { value: String },
    Template { parts: Vec<AstNode> },
    Array { elements: Vec<AstNode> },
    Object { entries: Vec<(String, AstNode)> },

    UnaryOp { op: UnaryOperator, expr: Box<AstNode> },
    BinaryOp { left: Box<AstNode>, op: BinaryOperator, right: Box<AstNode> },

    If {
        cond: Box<AstNode>,
        then: Box<AstNode>,
        elifs: Vec<(AstNode, AstNode)>,
        else_: Option<Box<AstNode>>,
    },
    Match { about: Box<AstNode>, arms: Vec<(AstNode, AstNode)>, default: Option<Box<AstNode>> },
    Block { statements: Vec<AstNode> },
    Function { params: Vec<Param>, body: Vec<AstNode> },
    Call { callee: Box<AstNode>, args: Vec<AstNode> },
    Exists { name: String },
    Identifier { name: String },
    Index { object: Box<AstNode>, index: Box<AstNode> },
    Member { object: Box<AstNode>, property: String },
}

use std::fmt;

impl fmt::Display for AstNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AstNodeKind::Script { .. } => "Script",
            AstNodeKind::Namespace { .. } => "Namespace",
            AstNodeKind::Meta { .. } => "Meta",
            AstNodeKind::Definition { .. } => "Definition",
            AstNodeKind::Assignment { .. } => "Assignment",
            AstNodeKind::Return { .. } => "Return",
            AstNodeKind::Each { .. } => "Each",
            AstNodeKind::ForTimes { .. } => "ForTimes",
            AstNodeKind::ForRange { .. } => "ForRange",
            AstNodeKind::Loop { .. } => "Loop",
            AstNodeKind::Break => "Break",
            AstNodeKind::Continue => "Continue",
            AstNodeKind::Null => "Null",
            AstNodeKind::Bool { .. } => "Bool",
            AstNodeKind::Number { .. } => "Number",
            AstNodeKind::String { .. } => "String",
            AstNodeKind::Template { .. } => "Template",
            AstNodeKind::Array { .. } => "Array",
            AstNodeKind::Object { .. } => "Object",
            AstNodeKind::UnaryOp { .. } => "UnaryOp",
            AstNodeKind::BinaryOp { .. } => "BinaryOp",
            AstNodeKind::If { .. } => "If",
            AstNodeKind::Match { .. } => "Match",
            AstNodeKind::Block { .. } => "Block",
            AstNodeKind::Function { .. } => "Function",
            AstNodeKind::Call { .. } => "Call",
            AstNodeKind::Exists { .. } => "Exists",
            AstNodeKind::Identifier { .. } => "Identifier",
            AstNodeKind::Index { .. } => "Index",
            AstNodeKind::Member { .. } => "Member",
        };
        write!(f, "{}", name)
    }
}
