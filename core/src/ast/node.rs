use serde::Serialize;

use crate::location;

use super::kind::AstNodeKind;

#[derive(Clone, PartialEq, Serialize)]
pub struct AstNode {
    pub kind: AstNodeKind,
    pub location: Option<location::Location>,
    #[serde(skip)]
    pub span: Option<location::Span>,
}

impl AstNode {
    pub fn new(
        node_type: AstNodeKind,
        location: Option<location::Location>,
        span: Option<location::Span>,
    ) -> Self {
        AstNode {
            kind: node_type,
            location,
            span,
        }
    }

    /// Builds a node without position data; used by embedders that construct
    /// trees by hand.
    pub fn bare(node_type: AstNodeKind) -> Self {
        Self::new(node_type, None, None)
    }

    pub fn with_location(mut self, location: location::Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn get_kind(&self) -> &AstNodeKind {
        &self.kind
    }
    pub fn get_location(&self) -> Option<&location::Location> {
        self.location.as_ref()
    }
}

use std::fmt;

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{}@{}:{}", self.kind, loc.line, loc.column),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl fmt::Debug for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Kind first so nested trees stay readable with {:#?}
        f.debug_struct("AstNode")
            .field("kind", &self.kind)
            .field("location", &self.location)
            .finish()
    }
}
