use crate::log::{Error, ErrorKind};
use serde::Serialize;
use serde_json::{to_value, Map, Value};
use std::collections::HashMap;

/// Data made available to a template during rendering.
///
/// # Examples
///
/// ```
/// use vellum::Store;
///
/// let store = Store::new()
///     .with_must("name", "taylor")
///     .with_must("age", 25);
/// assert!(store.get("name").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Store {
    /// Key/value pairs. Values are normalized through serde, so anything
    /// serializable may be stored.
    data: HashMap<String, Value>,
}

impl Store {
    /// Create a new [`Store`].
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert data that may be accessed by the given name during rendering.
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the value cannot be serialized.
    pub fn insert<S, T>(&mut self, name: S, value: T) -> Result<(), Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        let value = to_value(value).map_err(|_| {
            Error::build(ErrorKind::Configuration, "unable to serialize value")
        })?;
        self.data.insert(name.into(), value);

        Ok(())
    }

    /// Insert data that may be accessed by the given name during rendering.
    ///
    /// # Panics
    ///
    /// Panics when the value cannot be serialized.
    #[inline]
    pub fn insert_must<S, T>(&mut self, name: S, value: T)
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(name, value).unwrap();
    }

    /// Insert data that may be accessed by the given name during rendering,
    /// and return the [`Store`].
    ///
    /// # Errors
    ///
    /// Returns an [`Error`] when the value cannot be serialized.
    #[inline]
    pub fn with<S, T>(mut self, name: S, value: T) -> Result<Self, Error>
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert(name, value)?;

        Ok(self)
    }

    /// Insert data that may be accessed by the given name during rendering,
    /// and return the [`Store`].
    ///
    /// # Panics
    ///
    /// Panics when the value cannot be serialized.
    #[inline]
    pub fn with_must<S, T>(mut self, name: S, value: T) -> Self
    where
        S: Into<String>,
        T: Serialize,
    {
        self.insert_must(name, value);
        self
    }

    /// Return the value with the given name, if it exists.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Collect the entries into a single [`Value`], usable as the root frame
    /// of a `Context`.
    pub(crate) fn to_value(&self) -> Value {
        let mut object = Map::with_capacity(self.data.len());
        for (key, value) in &self.data {
            object.insert(key.clone(), value.clone());
        }

        Value::Object(object)
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use serde_json::json;

    #[test]
    fn test_insert() {
        let mut store = Store::new();
        store.insert("one", "two").unwrap();
        store.insert_must("three", json!({"four": 5}));

        assert_eq!(store.get("one"), Some(&json!("two")));
        assert_eq!(store.get("three"), Some(&json!({"four": 5})));
        assert_eq!(store.get("five"), None);
    }

    #[test]
    fn test_insert_fluent() {
        let store = Store::new()
            .with("one", "two")
            .unwrap()
            .with_must("three", 4);

        assert_eq!(store.get("one"), Some(&json!("two")));
        assert_eq!(store.get("three"), Some(&json!(4)));
    }

    #[test]
    fn test_to_value() {
        let store = Store::new().with_must("name", "taylor");
        let value = store.to_value();

        assert_eq!(value.get("name"), Some(&json!("taylor")));
    }
}
