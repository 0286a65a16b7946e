// SPDX-License-Identifier: MIT

use crate::dfp::{ConfigError, SharedNode};
use std::collections::HashMap;

/// External nodes addressable by name from a graph description
#[derive(Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, SharedNode>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, node: SharedNode) -> Result<(), ConfigError> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(ConfigError::DuplicateName(name));
        }
        self.nodes.insert(name, node);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<SharedNode> {
        self.nodes.get(name).cloned()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
