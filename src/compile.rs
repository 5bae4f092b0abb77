//! Compilation pipeline.
//!
//! Turns template source into a [`Template`] holding the node tree:
//!
//! &str -> Lexer -> (Token, Region) -> Parser -> Template
//!
//! A `Template` can be rendered against a `Store` any number of times.
pub mod lex;
pub mod parse;

mod syntax;
mod template;

pub use parse::{scope::Scope, tree, Parser};
pub use template::Template;

use crate::log::Error;

/// Compile the given text into a [`Template`].
///
/// # Errors
///
/// Returns an [`Error`] when the text contains invalid syntax.
///
/// # Examples
///
/// ```
/// let template = vellum::compile("hello, {{name}}!");
/// assert!(template.is_ok());
/// ```
pub fn compile(text: &str) -> Result<Template, Error> {
    Parser::new(text).compile(None)
}
