//! file: core/src/js/primitives.rs
//! description: names generated code relies on at run time.
//!
//! The runtime library must bind every name in `RUNTIME_PRIMITIVES`. The
//! root scope reserves these, plus the target language's reserved words, so
//! no source binding is ever lowered onto one of them.

pub const REPR: &str = "repr";
pub const CALL: &str = "call";
pub const GET_PROP: &str = "get_prop";
pub const SET_PROP: &str = "set_prop";
pub const GET_INDEX: &str = "get_index";
pub const SET_INDEX: &str = "set_index";
pub const INTERNAL_ERROR: &str = "internal_error";

pub const RUNTIME_PRIMITIVES: &[&str] = &[
    REPR,
    CALL,
    GET_PROP,
    SET_PROP,
    GET_INDEX,
    SET_INDEX,
    INTERNAL_ERROR,
    "assert_boolean",
    "assert_number",
    "assert_string",
    "assert_array",
    "assert_object",
    "assert_function",
];

pub const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield", "Infinity", "NaN", "Map", "Error",
];

/// Dynamic type tags checked by the `assert_*` primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Boolean,
    Number,
    String,
    Array,
    Object,
    Function,
}

impl TypeTag {
    pub fn assert_name(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "assert_boolean",
            TypeTag::Number => "assert_number",
            TypeTag::String => "assert_string",
            TypeTag::Array => "assert_array",
            TypeTag::Object => "assert_object",
            TypeTag::Function => "assert_function",
        }
    }

    /// Short name used in runtime diagnostics, e.g. `Expect num at 1:0`.
    pub fn short_name(&self) -> &'static str {
        match self {
            TypeTag::Boolean => "bool",
            TypeTag::Number => "num",
            TypeTag::String => "str",
            TypeTag::Array => "arr",
            TypeTag::Object => "obj",
            TypeTag::Function => "fn",
        }
    }

    pub fn all() -> [TypeTag; 6] {
        [
            TypeTag::Boolean,
            TypeTag::Number,
            TypeTag::String,
            TypeTag::Array,
            TypeTag::Object,
            TypeTag::Function,
        ]
    }
}

/// Codes accepted by `internal_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotDefined,
    ImmutableVariable,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotDefined => "not_defined",
            ErrorCode::ImmutableVariable => "immutable_variable",
        }
    }

    pub fn parse(code: &str) -> Option<ErrorCode> {
        match code {
            "not_defined" => Some(ErrorCode::NotDefined),
            "immutable_variable" => Some(ErrorCode::ImmutableVariable),
            _ => None,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
