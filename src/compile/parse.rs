pub mod scope;
pub mod tree;

use crate::{
    compile::{
        lex::{token::Token, Lexer},
        Template,
    },
    log::{
        Error, ErrorKind, INVALID_IDENTIFIER, MISMATCHED_SECTION, UNCLOSED_SECTION,
        UNEXPECTED_CLOSE,
    },
    region::Region,
};
use scope::Scope;
use tree::{Node, Partial, Section, Variable};

/// Assembles [`Token`] instances from a [`Lexer`] into a [`Template`].
pub struct Parser<'source> {
    /// Lexer used to pull from source as tokens instead of raw text.
    lexer: Lexer<'source>,
}

/// An open section whose closing tag has not been read yet.
struct Block {
    /// Helper or variable name from the opening tag.
    name: Region,
    /// Raw argument text from the opening tag, if any.
    args: Option<Region>,
    /// True for blocks opened with `{{^name}}`.
    inverted: bool,
}

impl<'source> Parser<'source> {
    /// Create a new Parser from the given string.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    /// Compile the template.
    ///
    /// Returns a new [`Template`], which can be rendered with some `Store`
    /// data to receive output.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the source contains an unclosed tag, an
    /// unclosed or mismatched section, or a closing tag with no matching
    /// opening tag.
    pub fn compile(mut self, name: Option<&str>) -> Result<Template, Error> {
        let source = self.lexer.source;

        // Open blocks, innermost last.
        let mut blocks: Vec<Block> = vec![];

        // Nodes for each unclosed area of the source. The first Scope is the
        // root, every open block adds one more.
        let mut scopes: Vec<Scope> = vec![Scope::new()];

        while let Some((token, region)) = self.lexer.next()? {
            match token {
                Token::Text => scopes
                    .last_mut()
                    .unwrap()
                    .nodes
                    .push(Node::Text(region)),
                Token::Comment => scopes
                    .last_mut()
                    .unwrap()
                    .nodes
                    .push(Node::Comment(region)),
                Token::Variable | Token::RawVariable => {
                    scopes.last_mut().unwrap().nodes.push(Node::Variable(Variable {
                        content: region.trim(source),
                        escape: token == Token::Variable,
                    }))
                }
                Token::Partial => {
                    let name = self.parse_name(region)?;
                    scopes
                        .last_mut()
                        .unwrap()
                        .nodes
                        .push(Node::Partial(Partial { name }))
                }
                Token::SectionOpen | Token::InvertedOpen => {
                    let (name, args) = self.parse_name_args(region)?;
                    blocks.push(Block {
                        name,
                        args,
                        inverted: token == Token::InvertedOpen,
                    });
                    scopes.push(Scope::new());
                }
                Token::SectionClose => {
                    let name = self.parse_name(region)?;
                    let block = match blocks.pop() {
                        Some(block) => block,
                        None => {
                            return Err(Error::build(ErrorKind::Parse, UNEXPECTED_CLOSE)
                                .with_pointer(source, name)
                                .with_help(format!(
                                    "closing tag for `{}` has no matching opening tag",
                                    &source[name]
                                )))
                        }
                    };
                    if source[block.name] != source[name] {
                        return Err(Error::build(ErrorKind::Parse, MISMATCHED_SECTION)
                            .with_pointer(source, name)
                            .with_help(format!(
                                "expected a closing tag for `{}`, found `{}`",
                                &source[block.name], &source[name]
                            )));
                    }

                    let body = scopes.pop().unwrap();
                    scopes.last_mut().unwrap().nodes.push(Node::Section(Section {
                        name: block.name,
                        args: block.args,
                        body,
                        inverted: block.inverted,
                    }));
                }
            }
        }

        if let Some(block) = blocks.first() {
            return Err(Error::build(ErrorKind::Parse, UNCLOSED_SECTION)
                .with_pointer(source, block.name)
                .with_help(format!(
                    "did you close the section with `{{{{/{}}}}}`?",
                    &source[block.name]
                )));
        }

        assert!(
            scopes.len() == 1,
            "parser should never have >1 scope after compilation"
        );

        Ok(Template {
            name: name.map(str::to_owned),
            scope: scopes.remove(0),
            source: source.to_owned(),
        })
    }

    /// Extract a single identifier from the given tag content.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the content is empty or is not a valid
    /// identifier.
    fn parse_name(&self, region: Region) -> Result<Region, Error> {
        let name = region.trim(self.lexer.source);
        if !is_identifier(name.literal(self.lexer.source)) {
            return Err(self.error_identifier(if name.is_empty() { region } else { name }));
        }

        Ok(name)
    }

    /// Split the given tag content into an identifier and the raw argument
    /// text that follows it, if any.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the leading identifier is missing or
    /// invalid.
    fn parse_name_args(&self, region: Region) -> Result<(Region, Option<Region>), Error> {
        let source = self.lexer.source;
        let content = region.trim(source);
        let window = content.literal(source);

        match window.find(char::is_whitespace) {
            Some(i) => {
                let name = Region::new(content.begin..content.begin + i);
                let args = Region::new(content.begin + i..content.end).trim(source);
                if !is_identifier(name.literal(source)) {
                    return Err(self.error_identifier(name));
                }

                Ok((name, Some(args)))
            }
            None => {
                if !is_identifier(window) {
                    return Err(self.error_identifier(if content.is_empty() {
                        region
                    } else {
                        content
                    }));
                }

                Ok((content, None))
            }
        }
    }

    /// Return an [`Error`] describing an invalid identifier at the given
    /// [`Region`].
    fn error_identifier(&self, region: Region) -> Error {
        Error::build(ErrorKind::Parse, INVALID_IDENTIFIER)
            .with_pointer(self.lexer.source, region)
            .with_help("section and partial names must begin with a letter or `_`")
    }
}

/// Return true if the given text is a recognized identifier.
///
/// The first character must be `_` or an `xid_start`, the remainder must be
/// `xid_continue` or one of `.`, `-`, `_`.
fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c == '_' || unicode_ident::is_xid_start(c) => {}
        _ => return false,
    }

    chars.all(|c| matches!(c, '.' | '-' | '_') || unicode_ident::is_xid_continue(c))
}
