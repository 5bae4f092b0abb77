pub mod token;

use super::syntax::{to_finder, Marker};
use crate::{
    log::{Error, ErrorKind, UNCLOSED_TAG},
    region::Region,
};
use morel::Finder;
use token::Token;

pub type TokenResult = Result<Option<(Token, Region)>, Error>;

/// Provides methods to read template source as [`Token`] instances.
///
/// Text between tags is surfaced verbatim, nothing is trimmed. A closing
/// delimiter that appears outside of any tag is treated as literal text.
pub struct Lexer<'source> {
    /// Reference to the source text.
    pub source: &'source str,
    /// Compiled [`Finder`] used to search for delimiters in the source text.
    finder: Finder<&'source str>,
    /// Position within source.
    cursor: usize,
    /// Temporary storage for a [`Token`] that will be read on the following
    /// call to `.next`.
    buffer: Option<(Token, Region)>,
}

impl<'source> Lexer<'source> {
    /// Create a new [`Lexer`] over the given source.
    #[inline]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            finder: to_finder(),
            cursor: 0,
            buffer: None,
        }
    }

    /// Return the next [`Token`] and [`Region`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when a tag is opened but never closed.
    pub fn next(&mut self) -> TokenResult {
        // Always prefer taking from the buffer when possible.
        if let Some(next) = self.buffer.take() {
            return Ok(Some(next));
        }
        if self.cursor >= self.source.len() {
            return Ok(None);
        }

        let from = self.cursor;
        let mut scan = from;
        loop {
            match self.finder.next(self.source, scan) {
                Some((id, marker_begin, marker_end)) => match Marker::from(id) {
                    Marker::End | Marker::EndRaw => {
                        // A closing delimiter with no opening tag is
                        // literal text.
                        scan = marker_end;
                    }
                    marker => {
                        let tag = self.lex_tag(marker, marker_begin, marker_end)?;
                        if from == marker_begin {
                            return Ok(Some(tag));
                        }

                        // Store the tag in the buffer and first return the
                        // text leading up to it.
                        self.buffer = Some(tag);
                        return Ok(Some((Token::Text, (from..marker_begin).into())));
                    }
                },
                None => {
                    self.cursor = self.source.len();
                    return Ok(Some((Token::Text, (from..self.source.len()).into())));
                }
            }
        }
    }

    /// Read the remainder of a tag whose opening delimiter covers
    /// `begin..end`.
    ///
    /// Advances the cursor beyond the closing delimiter.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the closing delimiter is missing or does
    /// not pair with the opening delimiter.
    fn lex_tag(&mut self, marker: Marker, begin: usize, end: usize) -> Result<(Token, Region), Error> {
        let raw = marker == Marker::BeginRaw;
        let mut content_begin = end;
        let token = if raw {
            Token::RawVariable
        } else {
            match self.source[end..].chars().next() {
                Some('#') => {
                    content_begin += 1;
                    Token::SectionOpen
                }
                Some('^') => {
                    content_begin += 1;
                    Token::InvertedOpen
                }
                Some('/') => {
                    content_begin += 1;
                    Token::SectionClose
                }
                Some('!') => {
                    content_begin += 1;
                    Token::Comment
                }
                Some('>') => {
                    content_begin += 1;
                    Token::Partial
                }
                Some(_) => Token::Variable,
                None => return Err(self.error_unclosed(begin, end)),
            }
        };

        match self.finder.next(self.source, content_begin) {
            Some((id, marker_begin, marker_end)) => match Marker::from(id) {
                Marker::End if !raw => {
                    self.cursor = marker_end;
                    Ok((token, (content_begin..marker_begin).into()))
                }
                Marker::EndRaw if raw => {
                    self.cursor = marker_end;
                    Ok((token, (content_begin..marker_begin).into()))
                }
                Marker::EndRaw => {
                    // The first two characters close the tag, the final `}`
                    // is literal text.
                    self.cursor = marker_begin + 2;
                    Ok((token, (content_begin..marker_begin).into()))
                }
                Marker::End => Err(Error::build(ErrorKind::Parse, UNCLOSED_TAG)
                    .with_pointer(self.source, marker_begin..marker_end)
                    .with_help("raw variables opened with `{{{` must be closed with `}}}`")),
                _ => Err(self.error_unclosed(begin, end)),
            },
            None => Err(self.error_unclosed(begin, end)),
        }
    }

    /// Return an [`Error`] describing an unclosed tag at the given offsets.
    fn error_unclosed(&self, begin: usize, end: usize) -> Error {
        Error::build(ErrorKind::Parse, UNCLOSED_TAG)
            .with_pointer(self.source, begin..end)
            .with_help(format!("tag opened at offset {begin} is never closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, Token};
    use crate::region::Region;

    #[test]
    fn test_lex_text_only() {
        let expect = vec![(Token::Text, 0..11)];

        helper_lex_next_auto("lorem ipsum", expect)
    }

    #[test]
    fn test_lex_variable() {
        let expect = vec![
            (Token::Text, 0..6),
            (Token::Variable, 8..14),
            (Token::Text, 16..17),
        ];

        helper_lex_next_auto("hello {{ name }}!", expect)
    }

    #[test]
    fn test_lex_raw_variable() {
        let expect = vec![(Token::RawVariable, 3..8)];

        helper_lex_next_auto("{{{ tag }}}", expect)
    }

    #[test]
    fn test_lex_section() {
        let expect = vec![
            (Token::SectionOpen, 3..12),
            (Token::Variable, 16..20),
            (Token::SectionClose, 25..29),
        ];

        helper_lex_next_auto("{{#each list}}{{this}}{{/each}}", expect)
    }

    #[test]
    fn test_lex_inverted_comment_partial() {
        let expect = vec![
            (Token::InvertedOpen, 3..4),
            (Token::Comment, 9..14),
            (Token::SectionClose, 19..20),
            (Token::Partial, 25..31),
        ];

        helper_lex_next_auto("{{^x}}{{! gone}}{{/x}}{{>header}}", expect)
    }

    #[test]
    fn test_lex_stray_closing_delimiter() {
        // A `}}` with no opening tag is literal text.
        let expect = vec![(Token::Text, 0..10)];

        helper_lex_next_auto("lorem }} b", expect)
    }

    #[test]
    fn test_lex_variable_extra_brace() {
        // `{{x}}}` is an escaped variable followed by a literal `}`.
        let expect = vec![(Token::Variable, 2..3), (Token::Text, 5..6)];

        helper_lex_next_auto("{{x}}}", expect)
    }

    #[test]
    fn test_lex_unclosed_tag() {
        let mut lexer = Lexer::new("hello {{name");
        assert_eq!(lexer.next(), Ok(Some((Token::Text, (0..6).into()))));
        assert!(lexer.next().is_err());
    }

    #[test]
    fn test_lex_multiple_opening_tags() {
        let mut lexer = Lexer::new("hello {{ name {{ }}");
        assert_eq!(lexer.next(), Ok(Some((Token::Text, (0..6).into()))));
        assert!(lexer.next().is_err());
    }

    /// Helper function which takes in a source string, creates a lexer on
    /// that string and compares the result of repeated `.next` calls against
    /// the expected tokens.
    fn helper_lex_next_auto<T>(source: &str, expect: Vec<(Token, T)>)
    where
        T: Into<Region>,
    {
        let mut lexer = Lexer::new(source);
        for (token, region) in expect {
            assert_eq!(lexer.next(), Ok(Some((token, region.into()))))
        }

        assert_eq!(lexer.next(), Ok(None));
        assert_eq!(lexer.next(), Ok(None));
    }
}
