use super::Scope;
use serde::{Deserialize, Serialize};

/// A compiled [`Template`] that can be rendered with a `Store`.
///
/// Templates are immutable once compiled and may be reused across any
/// number of renders. They serialize cleanly, which is what allows a
/// [`Cache`][`crate::Cache`] to store them between processes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// The name of the [`Template`].
    pub name: Option<String>,
    /// The Abstract Syntax Tree generated during compilation.
    pub scope: Scope,
    /// The source text from which this [`Template`] was generated.
    pub source: String,
}
