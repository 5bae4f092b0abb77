use super::scope::Scope;
use crate::region::Region;
use serde::{Deserialize, Serialize};

/// The Abstract Syntax Tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Raw text, copied to output verbatim.
    Text(Region),
    /// A variable or inline helper expression.
    Variable(Variable),
    /// A block whose body is rendered conditionally or repeatedly.
    Section(Section),
    /// Include another template, sharing the current scope.
    Partial(Partial),
    /// No output.
    Comment(Region),
}

/// An expression inside `{{ }}` or `{{{ }}}` delimiters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// The trimmed expression between the delimiters.
    ///
    /// May be a path, or a helper name followed by raw argument text.
    pub content: Region,
    /// True when output should be HTML escaped.
    pub escape: bool,
}

/// A block such as `{{#name args}} ... {{/name}}`.
///
/// Sections cover the built-in block helpers, user registered block helpers,
/// plain value-driven blocks, and inverted (`{{^name}}`) blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Helper or variable name.
    pub name: Region,
    /// Raw argument text following the name, if any.
    ///
    /// Splitting arguments is the receiving helper's concern, the parser
    /// keeps the text opaque.
    pub args: Option<Region>,
    /// Nodes within the block.
    pub body: Scope,
    /// True for blocks opened with `{{^name}}`.
    pub inverted: bool,
}

/// A partial inclusion, `{{>name}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partial {
    /// Name of the included template.
    pub name: Region,
}
