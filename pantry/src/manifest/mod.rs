//! Manifest parsing.
//!
//! A package manifest (`metadata.rb`) is a list of declarative statements,
//! one directive per statement:
//!
//! ```text
//! maintainer       "Opscode, Inc."
//! long_description IO.read(File.join(File.dirname(__FILE__), 'README.md'))
//! version          "1.0.0"
//!
//! attribute "vim/sucks",
//!   :display_name => "VIM sucks?",
//!   :default => "true"
//! ```
//!
//! The manifest is never evaluated. Only literals, option hashes and the
//! well-known "read a file next to this manifest" expression are understood;
//! anything else is rejected with a positioned [`ParseError`].
//!
//! Parsing is purely syntactic. Giving directives their meaning is the job of
//! the [`loader`](crate::loader).

mod lexer;
mod parser;

use thiserror::Error;

pub use parser::{parse_manifest, MAX_NESTING};

/// Errors produced while tokenizing or parsing a manifest.
///
/// Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A string literal was opened but never closed.
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at line {line}, column {column}")]
    UnexpectedChar { ch: char, line: usize, column: usize },

    /// A token that does not fit the grammar at this point.
    #[error("unexpected {found} at line {line}, column {column}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        line: usize,
        column: usize,
    },

    /// A call expression outside the supported subset.
    #[error("unsupported expression `{expr}` at line {line}, column {column}")]
    UnsupportedExpression {
        expr: String,
        line: usize,
        column: usize,
    },

    /// Arrays or calls nested deeper than the parser accepts.
    #[error("nesting deeper than {limit} levels at line {line}, column {column}")]
    TooDeep {
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line, .. }
            | Self::UnexpectedChar { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnsupportedExpression { line, .. }
            | Self::TooDeep { line, .. } => *line,
        }
    }
}

/// A literal value appearing in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Single- or double-quoted string, escapes already applied.
    Str(String),
    /// `:symbol`
    Symbol(String),
    /// Numeric literal, kept as written.
    Number(String),
    /// `true` / `false`
    Bool(bool),
    /// `nil`
    Nil,
    /// `[a, b, c]`
    Array(Vec<Value>),
    /// Contents of a file relative to the manifest's directory.
    ///
    /// Produced by `IO.read(File.join(File.dirname(__FILE__), 'README.md'))`.
    /// The path is stored with `/` separators and read by the loader.
    FileRef(String),
}

impl Value {
    /// Borrow the string payload of a string or symbol.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the value kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::Array(_) => "array",
            Value::FileRef(_) => "file reference",
        }
    }
}

/// One statement of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// Directive name (`maintainer`, `attribute`, ...).
    pub name: String,

    /// Positional arguments in order.
    pub args: Vec<Value>,

    /// Trailing `key => value` options in order.
    pub options: Vec<(String, Value)>,

    /// Line the directive starts on.
    pub line: usize,
}

impl Directive {
    /// Look up an option by key.
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// A parsed manifest: its directives in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub directives: Vec<Directive>,
}

impl Manifest {
    /// Iterate over directives with the given name.
    pub fn directives_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Directive> {
        self.directives.iter().filter(move |d| d.name == name)
    }
}
