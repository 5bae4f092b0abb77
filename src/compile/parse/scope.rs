use super::tree::Node;
use serde::{Deserialize, Serialize};

/// A distinct set of Node instances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scope {
    pub nodes: Vec<Node>,
}

impl Scope {
    /// Create a new Scope.
    #[inline]
    pub fn new() -> Self {
        Self { nodes: vec![] }
    }
}
