//! file: core/src/js/mod.rs
//! description: target-language AST, its text renderer and the runtime
//! interface generated code depends on.
pub mod ast;
pub mod primitives;
pub mod print;

pub use ast::{AssignOp, BinaryOp, DeclKind, DeferredBody, Expr, Function, Program, Ref, Stmt, UnaryOp};
pub use primitives::{ErrorCode, TypeTag};
pub use print::format_number;
