use std::fmt;

use crate::error::{AiscErrorExt, Level};
use crate::js::ErrorCode;
use crate::js::TypeTag;
use crate::location::{Location, Span};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// An `assert_*` primitive or an accessor saw the wrong dynamic type.
    TypeMismatch(TypeTag),
    IndexOutOfRange,
    /// Raised by `internal_error` on behalf of generated code.
    Internal(ErrorCode),
    /// An identifier with no binding in the executing environment.
    ReferenceError,
    /// Assignment to a `const` declaration.
    ConstAssignment,
    /// Raised on request of the running program, e.g. `Core:abort`.
    Abort,
    /// `get_index`/`set_index` on a value that is neither an array nor a map.
    InvalidTarget,
}

#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    message: String,
    /// Source name carried by `internal_error`.
    pub info: Option<String>,
    /// `[line, column]` as passed by generated code; the column is 0-based.
    pub pos: Option<(usize, usize)>,
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind, message: impl Into<String>) -> Self {
        RuntimeError { kind, message: message.into(), info: None, pos: None }
    }

    pub fn at(mut self, pos: Option<(usize, usize)>) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn type_mismatch(expected: TypeTag, pos: Option<(usize, usize)>) -> Self {
        RuntimeError::new(
            RuntimeErrorKind::TypeMismatch(expected),
            format!("Expect {} at {}", expected.short_name(), print_pos(pos)),
        )
        .at(pos)
    }

    pub fn internal(code: ErrorCode, name: &str, pos: Option<(usize, usize)>) -> Self {
        RuntimeError::new(
            RuntimeErrorKind::Internal(code),
            format!("{}: {} at {}", code, name, print_pos(pos)),
        )
        .with_info(name)
        .at(pos)
    }

    /// The `internal_error` code, if this error was raised by one.
    pub fn code(&self) -> Option<ErrorCode> {
        match self.kind {
            RuntimeErrorKind::Internal(code) => Some(code),
            _ => None,
        }
    }
}

/// `line:column` as printed by the runtime, `<internal>` when unknown.
pub(crate) fn print_pos(pos: Option<(usize, usize)>) -> String {
    match pos {
        Some((line, column)) => format!("{}:{}", line, column),
        None => "<internal>".to_string(),
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RuntimeError {}

impl AiscErrorExt for RuntimeError {
    fn level(&self) -> Level {
        match self.kind {
            RuntimeErrorKind::Abort => Level::Error,
            _ => Level::Critical,
        }
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "aisc.vm".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.pos
            .map(|(line, column)| Location::new("<generated>".to_string(), line, column + 1))
    }
}

impl From<RuntimeError> for Box<dyn AiscErrorExt> {
    fn from(err: RuntimeError) -> Self {
        Box::new(err)
    }
}
