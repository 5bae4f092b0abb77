use crate::log::{Error, ErrorKind, MALFORMED_STRING, MISSING_VARIABLE};
use serde_json::Value;

/// Variable resolution engine over stacked scopes.
///
/// The [`Context`] holds three parallel stacks. The value stack contains one
/// frame for every scope entered during a render, top frame first. The index
/// and key stacks are pushed by iteration around every loop step so that
/// `@index` and `@key` always describe the innermost active loop.
///
/// Every render owns its own `Context`; the compiled template itself is
/// immutable and may be shared between renders.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vellum::Context;
///
/// let mut context = Context::new(json!({"name": "taylor"}));
/// assert_eq!(context.get("name", false).unwrap(), json!("taylor"));
///
/// context.push(json!({"name": "morgan"}));
/// assert_eq!(context.get("name", false).unwrap(), json!("morgan"));
/// assert_eq!(context.get("../name", false).unwrap(), json!("taylor"));
/// ```
#[derive(Debug, Default)]
pub struct Context {
    /// Value frames, current scope last.
    stack: Vec<Value>,
    /// `@index` values pushed by iteration, innermost loop last.
    index: Vec<usize>,
    /// `@key` values pushed by iteration, innermost loop last.
    key: Vec<Value>,
}

impl Context {
    /// Create a new [`Context`] with the given value as the root frame.
    #[inline]
    pub fn new(value: Value) -> Self {
        Self {
            stack: vec![value],
            index: vec![],
            key: vec![],
        }
    }

    /// Create a new [`Context`] with no frames at all.
    ///
    /// Every lookup on an empty `Context` resolves to empty string in
    /// lenient mode.
    #[inline]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Push a new frame onto the value stack.
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// Pop the last frame from the value stack.
    #[inline]
    pub fn pop(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Return the last frame on the value stack.
    #[inline]
    pub fn last(&self) -> Option<&Value> {
        self.stack.last()
    }

    /// Push an index onto the index stack.
    #[inline]
    pub fn push_index(&mut self, index: usize) {
        self.index.push(index);
    }

    /// Pop the last index from the index stack.
    #[inline]
    pub fn pop_index(&mut self) -> Option<usize> {
        self.index.pop()
    }

    /// Return the index of the innermost active loop.
    #[inline]
    pub fn last_index(&self) -> Option<usize> {
        self.index.last().copied()
    }

    /// Push a key onto the key stack.
    #[inline]
    pub fn push_key(&mut self, key: Value) {
        self.key.push(key);
    }

    /// Pop the last key from the key stack.
    #[inline]
    pub fn pop_key(&mut self) -> Option<Value> {
        self.key.pop()
    }

    /// Return the key of the innermost active loop.
    #[inline]
    pub fn last_key(&self) -> Option<&Value> {
        self.key.last()
    }

    /// Resolve the given path and push the result as a new frame.
    ///
    /// Returns a clone of the pushed value.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the path contains a malformed quoted
    /// literal.
    pub fn with(&mut self, path: &str) -> Result<Value, Error> {
        let value = self.get(path, false)?;
        self.push(value.clone());

        Ok(value)
    }

    /// Resolve the given path against the current scope.
    ///
    /// A path is a dotted name, optionally prefixed with one `../` per
    /// enclosing frame to climb away from the current scope. The special
    /// forms `.`, `this`, `@index`, `@key`, `true`, `false` and quoted
    /// string literals are resolved before any frame lookup happens.
    ///
    /// In lenient mode an unresolvable path yields an empty string. Once a
    /// chunk of a dotted path resolves to an empty string, the remaining
    /// chunks are skipped and the empty string is returned as is.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] of kind [`ErrorKind::Lookup`] when `strict` is
    /// true and the path cannot be resolved, and of kind
    /// [`ErrorKind::Parse`] when the path holds a quoted literal with
    /// mismatched or missing quotes, regardless of `strict`.
    pub fn get(&self, path: &str, strict: bool) -> Result<Value, Error> {
        let mut name = path.trim();
        let mut level = 0;
        while let Some(rest) = name.strip_prefix("../") {
            name = rest.trim();
            level += 1;
        }
        if self.stack.len() < level {
            return self.missing(path, strict);
        }

        // The frame `level` positions below the top of the stack. Climbing
        // exactly off the stack leaves no base frame, which resolves like
        // any other missing value.
        let base = if level < self.stack.len() {
            self.stack.get(self.stack.len() - 1 - level)
        } else {
            None
        };

        if name.is_empty() {
            return self.missing(path, strict);
        }
        if name == "." || name == "this" {
            return Ok(base.cloned().unwrap_or_else(empty));
        }
        if name == "@index" {
            return Ok(self.last_index().map(Value::from).unwrap_or_else(empty));
        }
        if name == "@key" {
            return Ok(self.last_key().cloned().unwrap_or_else(empty));
        }
        if name == "true" {
            return Ok(Value::Bool(true));
        }
        if name == "false" {
            return Ok(Value::Bool(false));
        }
        if name.starts_with('\'') || name.starts_with('"') {
            let first = name.chars().next().unwrap();
            if name.len() > 2 && name.ends_with(first) {
                return Ok(Value::String(name[1..name.len() - 1].to_owned()));
            }
            return Err(Error::build(ErrorKind::Parse, MALFORMED_STRING)
                .with_help(format!("string literal `{name}` is not properly quoted")));
        }

        let mut current = base.cloned().unwrap_or(Value::Null);
        for chunk in name.split('.') {
            if matches!(&current, Value::String(text) if text.is_empty()) {
                return Ok(current);
            }
            current = self.find(current, chunk, path, strict)?;
        }

        Ok(current)
    }

    /// Resolve a single path chunk against the given value.
    ///
    /// An empty chunk and the literal chunk `this` resolve to the value
    /// itself. Otherwise objects are searched by key and arrays by numeric
    /// index.
    fn find(&self, variable: Value, inside: &str, path: &str, strict: bool) -> Result<Value, Error> {
        if inside.is_empty() || inside == "this" {
            return Ok(variable);
        }
        match &variable {
            Value::Object(object) => {
                if let Some(value) = object.get(inside) {
                    return Ok(value.clone());
                }
            }
            Value::Array(items) => {
                if let Ok(index) = inside.parse::<usize>() {
                    if let Some(value) = items.get(index) {
                        return Ok(value.clone());
                    }
                }
            }
            _ => {}
        }

        self.missing(path, strict)
    }

    /// Resolve a missing value, by error in strict mode and empty string
    /// otherwise.
    fn missing(&self, path: &str, strict: bool) -> Result<Value, Error> {
        if strict {
            return Err(Error::build(ErrorKind::Lookup, MISSING_VARIABLE)
                .with_help(format!("variable `{}` is not in scope", path.trim())));
        }

        Ok(empty())
    }
}

/// The empty string, which doubles as the "no value" result in lenient mode.
fn empty() -> Value {
    Value::String(String::new())
}

/// Return true when block helpers should treat the given value as true.
///
/// The empty string, the string `"0"`, the number zero, `false`, null and
/// empty collections are false. Everything else is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(bool) => *bool,
        Value::Number(number) => number.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(string) => !string.is_empty() && string != "0",
        Value::Array(array) => !array.is_empty(),
        Value::Object(object) => !object.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::{is_truthy, Context};
    use crate::log::ErrorKind;
    use serde_json::{json, Value};

    #[test]
    fn test_get_and_parent_lookup() {
        let mut context = Context::new(json!({
            "value": "value",
            "array": {"a": "1", "b": "2"},
        }));
        assert_eq!(context.get("value", false).unwrap(), json!("value"));
        assert_eq!(context.get("value", true).unwrap(), json!("value"));
        assert_eq!(context.get("array.a", true).unwrap(), json!("1"));
        assert_eq!(context.get("array.b", true).unwrap(), json!("2"));

        let new = json!({"value": "new value"});
        context.push(new.clone());
        assert_eq!(context.get("value", false).unwrap(), json!("new value"));
        assert_eq!(context.get("value", true).unwrap(), json!("new value"));
        assert_eq!(context.get("../value", false).unwrap(), json!("value"));
        assert_eq!(context.get("../value", true).unwrap(), json!("value"));
        assert_eq!(context.last(), Some(&new));
        assert_eq!(context.get(".", false).unwrap(), new);
        assert_eq!(context.get("this", false).unwrap(), new);
        assert_eq!(context.get("this.", false).unwrap(), new);

        context.pop();
        assert_eq!(context.get("value", false).unwrap(), json!("value"));
        assert_eq!(context.last_index(), None);
    }

    #[test]
    fn test_get_dot_equals_last() {
        let context = Context::new(json!([1, 2]));
        assert_eq!(&context.get(".", false).unwrap(), context.last().unwrap());
        assert_eq!(&context.get("this", false).unwrap(), context.last().unwrap());
    }

    #[test]
    fn test_get_strict_errors() {
        let context = Context::new(json!({}));
        for path in ["../../data", "data", "", "data.key.key"] {
            assert_eq!(context.get(path, false).unwrap(), json!(""));

            let error = context.get(path, true).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Lookup);
        }
    }

    #[test]
    fn test_get_quoted_literal() {
        let context = Context::new(json!({}));
        assert_eq!(context.get("'foo'", false).unwrap(), json!("foo"));
        assert_eq!(context.get("\"foo\"", false).unwrap(), json!("foo"));
    }

    #[test]
    fn test_get_malformed_literal() {
        let context = Context::new(json!({}));
        for path in ["'foo", "'foo\"", "''", "\""] {
            // Malformed literals are structural failures, lenient mode does
            // not soften them.
            let error = context.get(path, false).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Parse);
        }
    }

    #[test]
    fn test_get_boolean_literal() {
        let context = Context::new(json!({}));
        assert_eq!(context.get("true", false).unwrap(), json!(true));
        assert_eq!(context.get("false", false).unwrap(), json!(false));
    }

    #[test]
    fn test_get_index_and_key() {
        let mut context = Context::new(json!({}));
        assert_eq!(context.get("@index", false).unwrap(), json!(""));
        assert_eq!(context.get("@key", false).unwrap(), json!(""));

        context.push_index(3);
        context.push_key(Value::from("letter"));
        assert_eq!(context.get("@index", false).unwrap(), json!(3));
        assert_eq!(context.get("@key", false).unwrap(), json!("letter"));

        context.pop_key();
        context.pop_index();
        assert_eq!(context.get("@index", false).unwrap(), json!(""));
    }

    #[test]
    fn test_get_empty_short_circuit() {
        // Once a chunk resolves to empty string, the rest of the path is
        // skipped instead of failing.
        let context = Context::new(json!({"a": ""}));
        assert_eq!(context.get("a.b.c", false).unwrap(), json!(""));
    }

    #[test]
    fn test_get_array_index() {
        let context = Context::new(json!({"items": ["one", "two"]}));
        assert_eq!(context.get("items.1", false).unwrap(), json!("two"));
        assert_eq!(context.get("items.9", false).unwrap(), json!(""));
    }

    #[test]
    fn test_with_pushes_frame() {
        let mut context = Context::new(json!({"inner": {"x": 1}}));
        let value = context.with("inner").unwrap();
        assert_eq!(value, json!({"x": 1}));
        assert_eq!(context.get("x", false).unwrap(), json!(1));

        context.pop();
        assert_eq!(context.get("x", false).unwrap(), json!(""));
    }

    #[test]
    fn test_empty_context_is_lenient() {
        let context = Context::empty();
        assert_eq!(context.get("anything", false).unwrap(), json!(""));
        assert_eq!(context.get(".", false).unwrap(), json!(""));
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("text")));
        assert!(is_truthy(&json!([0])));
        assert!(is_truthy(&json!({"a": 1})));

        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));
        assert!(!is_truthy(&Value::Null));
    }
}
