use std::fmt::Display;

/// Tokens emitted by the Lexer.
///
/// Every token is paired with a [`Region`][`crate::Region`] pointing to the
/// text it covers. For tag tokens the region covers the content between the
/// delimiters, excluding the sigil character.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    /// Literal text outside of any tag.
    Text,
    /// An escaped variable or inline helper expression - `{{ ... }}`.
    Variable,
    /// An unescaped variable expression - `{{{ ... }}}`.
    RawVariable,
    /// A section opening tag - `{{# ... }}`.
    SectionOpen,
    /// An inverted section opening tag - `{{^ ... }}`.
    InvertedOpen,
    /// A section closing tag - `{{/ ... }}`.
    SectionClose,
    /// A comment - `{{! ... }}`.
    Comment,
    /// A partial inclusion - `{{> ... }}`.
    Partial,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Text => write!(f, "text"),
            Token::Variable => write!(f, "variable"),
            Token::RawVariable => write!(f, "raw variable"),
            Token::SectionOpen => write!(f, "section open"),
            Token::InvertedOpen => write!(f, "inverted section open"),
            Token::SectionClose => write!(f, "section close"),
            Token::Comment => write!(f, "comment"),
            Token::Partial => write!(f, "partial"),
        }
    }
}
