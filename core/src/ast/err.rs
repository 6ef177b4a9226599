use crate::error::{AiscErrorExt, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone)]
pub struct EmptyScriptError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl EmptyScriptError {
    pub fn new(issuer: String, location: Option<Location>, span: Option<Span>) -> Self {
        EmptyScriptError {
            level: Level::Error,
            message: "The provided script is empty.".to_string(),
            issuer,
            location,
            span,
        }
    }
}

impl std::fmt::Display for EmptyScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for EmptyScriptError {}

impl AiscErrorExt for EmptyScriptError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

#[derive(Debug, Clone)]
pub struct SyntaxError {
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl SyntaxError {
    pub fn with(level: Level, message: String, issuer: String, location: Option<Location>, span: Option<Span>) -> Self {
        SyntaxError {
            level,
            message,
            issuer,
            location,
            span,
        }
    }

    /// Shorthand for an `Error`-level syntax error already boxed as a trait object.
    pub fn boxed(
        message: impl Into<String>,
        issuer: &str,
        location: Option<Location>,
        span: Option<Span>,
    ) -> Box<dyn AiscErrorExt> {
        Box::new(SyntaxError::with(
            Level::Error,
            message.into(),
            issuer.to_string(),
            location,
            span,
        ))
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} (at {})", self.message, loc),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl AiscErrorExt for SyntaxError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}
