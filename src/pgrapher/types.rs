// SPDX-License-Identifier: MIT

//! Schema types for graph description files
//!
//! A description lists the edges to wire, each naming a tail and a head
//! node plus port indices. It may also declare built-in nodes for the
//! command line tool to instantiate.

use serde::{Deserialize, Serialize};

/// Top-level graph description
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct GraphConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Built-in nodes to instantiate, by name
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
    /// Connections, wired in order
    #[serde(default)]
    pub edges: Vec<EdgeConfig>,
}

/// One connection from an output port to an input port
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EdgeConfig {
    pub tail: Endpoint,
    pub head: Endpoint,
}

/// A node name and a port index on it
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Endpoint {
    pub node: String,
    #[serde(default)]
    pub port: usize,
}

impl Endpoint {
    pub fn new(node: impl Into<String>, port: usize) -> Self {
        Self {
            node: node.into(),
            port,
        }
    }
}

/// A named built-in node
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct NodeConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: BuiltinKind,
}

/// Built-in node types, all passing `i64` values
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuiltinKind {
    /// Source emitting `start`, `start + 1`, ... `count` times
    Range {
        #[serde(default)]
        start: i64,
        count: u64,
    },
    /// Function multiplying by `factor`
    Scale { factor: i64 },
    /// Expander repeating each value `times` times
    Repeat { times: usize },
    /// Join adding one value from each of `inputs` ports
    Sum { inputs: usize },
    /// Batch node emitting the sum of each adjacent pair
    Pairwise,
    /// Sink printing each value
    Print {
        #[serde(default)]
        prefix: String,
    },
    /// Sink recording each value for inspection
    Collect,
}
