use crate::log::{error_write, Error};
use serde_json::Value;
use std::fmt::Write;

/// Writes rendered output to an underlying buffer.
///
/// Provides value display rules, so `null` renders as nothing and arrays
/// render as `[one, two]`, and HTML escaping for unsafe positions.
pub struct Formatter<'buffer> {
    buffer: &'buffer mut dyn Write,
}

impl<'buffer> Formatter<'buffer> {
    /// Create a new [`Formatter`] over the given buffer.
    #[inline]
    pub fn new(buffer: &'buffer mut impl Write) -> Self {
        Self { buffer }
    }

    /// Write the given value to the buffer without escaping.
    pub fn write_value(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => Ok(()),
            Value::Bool(bool) => self.write_fmt(format_args!("{bool}")),
            Value::Number(number) => self.write_fmt(format_args!("{number}")),
            Value::String(string) => self.write_str(string),
            Value::Array(array) => {
                self.write_char('[')?;
                for (index, item) in array.iter().enumerate() {
                    if index > 0 {
                        self.write_str(", ")?;
                    }
                    self.write_value(item)?;
                }
                self.write_char(']')
            }
            Value::Object(object) => {
                self.write_char('{')?;
                for (index, (key, item)) in object.iter().enumerate() {
                    if index > 0 {
                        self.write_str(", ")?;
                    }
                    self.write_str(key)?;
                    self.write_str(": ")?;
                    self.write_value(item)?;
                }
                self.write_char('}')
            }
        }
    }

    /// Write the given value to the buffer, escaping HTML when the value is
    /// a string.
    pub fn write_value_escaped(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::String(string) => self.write_escaped(string),
            other => self.write_value(other),
        }
    }

    /// Write the given text to the buffer, replacing `&`, `<`, `>` and `"`
    /// with their HTML entities.
    ///
    /// Single quotes are written through unchanged.
    pub fn write_escaped(&mut self, text: &str) -> Result<(), Error> {
        for c in text.chars() {
            match c {
                '&' => self.write_str("&amp;")?,
                '<' => self.write_str("&lt;")?,
                '>' => self.write_str("&gt;")?,
                '"' => self.write_str("&quot;")?,
                other => self.write_char(other)?,
            }
        }

        Ok(())
    }

    /// Write the given text to the buffer as is.
    #[inline]
    pub fn write_str(&mut self, text: &str) -> Result<(), Error> {
        self.buffer.write_str(text).map_err(|_| error_write())
    }

    /// Write the given character to the buffer as is.
    #[inline]
    pub fn write_char(&mut self, c: char) -> Result<(), Error> {
        self.buffer.write_char(c).map_err(|_| error_write())
    }

    /// Write formatted text to the buffer as is.
    #[inline]
    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) -> Result<(), Error> {
        self.buffer.write_fmt(args).map_err(|_| error_write())
    }
}

#[cfg(test)]
mod tests {
    use super::Formatter;
    use serde_json::{json, Value};

    fn helper_write(value: &Value, escaped: bool) -> String {
        let mut buffer = String::new();
        let mut formatter = Formatter::new(&mut buffer);
        if escaped {
            formatter.write_value_escaped(value).unwrap();
        } else {
            formatter.write_value(value).unwrap();
        }

        buffer
    }

    #[test]
    fn test_write_value() {
        assert_eq!(helper_write(&Value::Null, false), "");
        assert_eq!(helper_write(&json!(true), false), "true");
        assert_eq!(helper_write(&json!(10.5), false), "10.5");
        assert_eq!(helper_write(&json!("text"), false), "text");
        assert_eq!(helper_write(&json!(["a", "b"]), false), "[a, b]");
        assert_eq!(helper_write(&json!({"a": 1, "b": 2}), false), "{a: 1, b: 2}");
    }

    #[test]
    fn test_write_value_escaped() {
        assert_eq!(
            helper_write(&json!(r#"<b class="x">&'</b>"#), true),
            "&lt;b class=&quot;x&quot;&gt;&amp;'&lt;/b&gt;"
        );
        // Only strings are escaped, other values cannot hold markup.
        assert_eq!(helper_write(&json!(5), true), "5");
    }
}
