use crate::{log::Error, render::Body, Context};

/// Output produced by a [`Helper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Output that is escaped when it lands in an escaping position.
    Text(String),
    /// Output that is appended verbatim, never escaped.
    Safe(String),
}

/// A named function dispatched by `{{name args}}` and `{{#name args}}`
/// expressions.
///
/// Helpers receive the body of the block they were invoked with (empty for
/// inline invocations), the active [`Context`], and the raw argument text
/// exactly as it appeared in the tag. Use [`split_arguments`] to break the
/// text into words, and [`Context::get`] to resolve each word as a path or
/// quoted literal.
///
/// The trait is implemented for closures, so most helpers don't need a
/// dedicated type:
///
/// ```
/// use vellum::{Body, Context, Engine, Rendered, Store};
///
/// let engine = Engine::default().with_helper_must("shout", |_body: Body, _context: &mut Context, args: &str| {
///     Ok(Rendered::Text(args.to_uppercase()))
/// });
///
/// let result = engine.render("{{shout hey}}", &Store::new());
/// assert_eq!(result.unwrap(), "HEY");
/// ```
pub trait Helper: Sync + Send {
    /// Execute the [`Helper`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the helper cannot produce output from the
    /// given arguments.
    fn call(&self, body: Body<'_>, context: &mut Context, args: &str) -> Result<Rendered, Error>;
}

impl<F> Helper for F
where
    F: for<'render> Fn(Body<'render>, &mut Context, &str) -> Result<Rendered, Error> + Sync + Send,
{
    #[inline]
    fn call(&self, body: Body<'_>, context: &mut Context, args: &str) -> Result<Rendered, Error> {
        self(body, context, args)
    }
}

/// Split raw helper argument text into words.
///
/// Words are separated by whitespace. A word beginning with `'` or `"` runs
/// until the matching quote, and keeps its quotes so the receiver can tell
/// literals apart from paths.
pub fn split_arguments(raw: &str) -> Vec<String> {
    let mut words = vec![];
    let mut chars = raw.char_indices().peekable();

    while let Some(&(begin, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut end = raw.len();
        if c == '\'' || c == '"' {
            chars.next();
            for (i, next) in chars.by_ref() {
                if next == c {
                    end = i + next.len_utf8();
                    break;
                }
            }
        } else {
            for (i, next) in chars.by_ref() {
                if next.is_whitespace() {
                    end = i;
                    break;
                }
            }
        }
        words.push(raw[begin..end].to_owned());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::split_arguments;

    #[test]
    fn test_split_arguments() {
        assert_eq!(split_arguments(""), Vec::<String>::new());
        assert_eq!(split_arguments("  one  two "), vec!["one", "two"]);
        assert_eq!(
            split_arguments(r#"'taylor smith' "x y" z"#),
            vec!["'taylor smith'", "\"x y\"", "z"]
        );
    }

    #[test]
    fn test_split_arguments_unterminated_quote() {
        // An unterminated quote runs to the end of the text. Resolution of
        // the malformed literal fails later, in Context::get.
        assert_eq!(split_arguments("'oops and more"), vec!["'oops and more"]);
    }
}
