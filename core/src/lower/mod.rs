//! file: core/src/lower/mod.rs
//! description: lowering of the expression-oriented AST into the target AST.
//!
//! A compilation runs in two phases over the top-level nodes. Namespace
//! members are lowered first, recursively, so that their qualified names
//! are bound before any other top-level code refers to them. Every other
//! node follows in source order. Function bodies are postponed through the
//! `LoweringContext` queue and produced once both phases are done.
//!
pub mod err;
pub mod lower_dest;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;
pub mod scope;
pub(crate) mod utils;

use std::rc::Rc;

use log::debug;

use crate::ast::{AstNode, AstNodeKind};
use crate::error::AiscErrorExt;
use crate::js::Program;
use crate::js::primitives::{RESERVED_WORDS, RUNTIME_PRIMITIVES};
use crate::script::Script;

pub use err::{LowerError, LowerErrorKind};
pub use lowering_context::LoweringContext;
pub use scope::{Scope, ScopeEntry};

/// Host globals made visible to compiled programs.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub globals: Vec<String>,
}

impl Options {
    pub fn with_globals<'n>(names: impl IntoIterator<Item = &'n str>) -> Self {
        Options { globals: names.into_iter().map(str::to_string).collect() }
    }

    pub fn global_scope(&self) -> Rc<Scope> {
        let names: Vec<&str> = self.globals.iter().map(String::as_str).collect();
        create_global_scope(&names)
    }
}

/// Root scope with the runtime primitives reserved and one immutable entry
/// per host global.
pub fn create_global_scope(globals: &[&str]) -> Rc<Scope> {
    let scope = Scope::root(RUNTIME_PRIMITIVES.iter().chain(RESERVED_WORDS).copied());
    for name in globals {
        scope.define(name, false);
    }
    scope
}

/// Lowers a sequence of top-level nodes in a fresh child of `global`.
pub fn compile<'a>(nodes: &'a [AstNode], global: &Rc<Scope>) -> Result<Program, LowerError> {
    let scope = global.child();
    let mut ctx = LoweringContext::new();
    let mut body = Vec::new();

    lower_top_level(nodes, &scope, &mut ctx, &mut body)?;
    ctx.drain()?;

    debug!("lowered {} top-level node(s) into {} statement(s)", nodes.len(), body.len());
    Ok(Program { body })
}

fn lower_top_level<'a>(
    nodes: &'a [AstNode],
    scope: &Rc<Scope>,
    ctx: &mut LoweringContext<'a>,
    out: &mut Vec<crate::js::Stmt>,
) -> Result<(), LowerError> {
    for node in nodes {
        if let AstNodeKind::Namespace { name, members } = &node.kind {
            lower_top_level(members, &scope.namespace(name), ctx, out)?;
        }
    }

    for node in nodes {
        match &node.kind {
            AstNodeKind::Namespace { .. } => {}
            AstNodeKind::Meta { name, .. } => {
                debug!("skipping meta block {:?} at {:?}", name, node.get_location());
            }
            _ => {
                let value = lower_stmt::lower_statement(node, scope, ctx, out)?;
                utils::discard(out, value);
            }
        }
    }
    Ok(())
}

/// Parses, lowers and renders `script` against `scope`.
pub fn transform(script: &Script, scope: &Rc<Scope>) -> Result<String, Box<dyn AiscErrorExt>> {
    let program = crate::compile_with_scope(script, scope)?;
    Ok(program.to_source())
}
