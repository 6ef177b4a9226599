use std::fmt;

use crate::error::{AiscErrorExt, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerErrorKind {
    /// A node that cannot be bound or assigned to appeared in pattern position.
    InvalidDestination,
    /// A construct the lowering core reserves but does not implement.
    UnsupportedConstruct,
    /// A node that only makes sense inside another construct reached the
    /// lowering core on its own.
    Misplaced,
}

/// Fatal compile-time failure. Binding errors are not reported through
/// this type; they become runtime `internal_error` calls instead.
#[derive(Debug, Clone)]
pub struct LowerError {
    pub kind: LowerErrorKind,
    message: String,
    issuer: String,
    location: Option<Location>,
}

impl LowerError {
    pub fn new(kind: LowerErrorKind, message: String, issuer: &str, location: Option<Location>) -> Self {
        LowerError { kind, message, issuer: issuer.to_string(), location }
    }
}

impl fmt::Display for LowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for LowerError {}

impl AiscErrorExt for LowerError {
    fn level(&self) -> Level {
        match self.kind {
            LowerErrorKind::InvalidDestination | LowerErrorKind::Misplaced => Level::Critical,
            LowerErrorKind::UnsupportedConstruct => Level::Error,
        }
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

impl From<LowerError> for Box<dyn AiscErrorExt> {
    fn from(err: LowerError) -> Self {
        Box::new(err)
    }
}
