pub mod ast;
pub mod error;
pub mod js;
pub mod location;
pub mod lower;
pub mod script;
pub mod vm;

pub use ast::{RulesParser, generate_ast_from_source};
pub use error::{AiscErrorExt, Level};
pub use location::{Location, Span};
pub use lower::{Options, compile, create_global_scope, transform};
pub use script::Script;
pub use vm::{RuntimeError, VM, Value};

pub fn generate_error_report(error: &dyn AiscErrorExt) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("AISC | {} | {} | {}", level, location, message)
}

/// Parses and lowers `source` against the scope described by `options`.
pub fn compile_source(source: &Script, options: &Options) -> Result<js::Program, Box<dyn AiscErrorExt>> {
    let scope = options.global_scope();
    compile_with_scope(source, &scope)
}

pub fn compile_with_scope(
    source: &Script,
    scope: &std::rc::Rc<lower::Scope>,
) -> Result<js::Program, Box<dyn AiscErrorExt>> {
    let ast = generate_ast_from_source(source)?;
    let program = match &ast.kind {
        ast::AstNodeKind::Script { body } => compile(body, scope)?,
        _ => compile(std::slice::from_ref(&ast), scope)?,
    };
    Ok(program)
}

/// Compiles `source` with `host` as its globals and runs it on the
/// reference VM.
pub fn run_source<'n>(
    source: &Script,
    host: impl IntoIterator<Item = (&'n str, Value)>,
) -> Result<Value, Box<dyn AiscErrorExt>> {
    let host: Vec<(&str, Value)> = host.into_iter().collect();
    let options = Options::with_globals(host.iter().map(|(name, _)| *name));
    let scope = options.global_scope();
    let program = compile_with_scope(source, &scope)?;
    let value = VM::new(program).with_host(&scope, host).run()?;
    Ok(value)
}
