pub mod err;
pub mod exec;
pub mod host;
pub mod runtime;
pub mod value;

use log::debug;

use crate::js::Program;
use crate::lower::Scope;

pub use err::{RuntimeError, RuntimeErrorKind};
pub use value::Value;

/// Reference runtime for lowered programs.
///
/// Tracing of every executed statement is enabled with `with_tracing` or by
/// setting `AISC_TRACE=1`; trace lines go through `log::trace!`.
pub struct VM {
    program: Program,
    globals: Vec<(String, Value)>,
    trace: bool,
}

impl VM {
    pub fn new(program: Program) -> Self {
        let trace = std::env::var("AISC_TRACE").map(|v| v == "1").unwrap_or(false);
        VM { program, globals: Vec::new(), trace }
    }

    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.trace = enabled;
        self
    }

    /// Binds `value` under a target name of the compiled program.
    pub fn with_global(mut self, target_name: &str, value: Value) -> Self {
        self.globals.push((target_name.to_string(), value));
        self
    }

    /// Binds host values by source name, resolving each through the scope
    /// the program was compiled against. Names the scope never declared are
    /// skipped.
    pub fn with_host<'n>(mut self, scope: &Scope, bindings: impl IntoIterator<Item = (&'n str, Value)>) -> Self {
        for (name, value) in bindings {
            match scope.lookup(name) {
                Some(entry) => self.globals.push((entry.target_name, value)),
                None => debug!("host binding '{}' is not declared in the global scope", name),
            }
        }
        self
    }

    pub fn run(&self) -> Result<Value, RuntimeError> {
        let env = exec::Env::root();
        runtime::install(&env);
        for (name, value) in &self.globals {
            env.declare(name, value.clone(), true);
        }

        let mut interpreter = exec::Interpreter::new(self.trace);
        let result = interpreter.run(&self.program, &env);
        debug!("program finished after {} statement(s)", interpreter.steps());
        result
    }
}
