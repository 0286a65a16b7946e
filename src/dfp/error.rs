// SPDX-License-Identifier: MIT

//! Typed error handling for the dataflow engine
//!
//! Errors come in two fatal tiers: configuration errors raised while a graph
//! is being built, and contract violations raised while it runs. A node that
//! simply cannot progress is not an error and never shows up here.

use thiserror::Error;

use super::port::Direction;
use super::protocol::Category;

/// Error type an external node may raise from its entry point
pub type NodeError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error type for pgraph-rs
#[derive(Debug, Error)]
pub enum DfpError {
    /// Graph construction errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Contract violations detected while running
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    /// Errors raised by an external node, passed through unchanged
    #[error(transparent)]
    Node(NodeError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON graph description errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML graph description errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised while building a graph, before execution starts
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Tail output and head input carry different signatures
    #[error("Port signature mismatch: \"{tail}\" != \"{head}\"")]
    SignatureMismatch { tail: String, head: String },

    /// Port index outside the node's port list
    #[error("Node '{node}' has {count} {direction} port(s), no index {index}")]
    PortOutOfRange {
        node: String,
        direction: Direction,
        index: usize,
        count: usize,
    },

    /// Port already has an edge plugged in
    #[error("{direction} port {index} of node '{node}' is already connected")]
    PortInUse {
        node: String,
        direction: Direction,
        index: usize,
    },

    /// Node id does not belong to the graph
    #[error("Unknown node id: {0}")]
    UnknownNode(usize),

    /// External node handle is missing
    #[error("Null node handle")]
    NullNode,

    /// No constructor bound for the category
    #[error("No node maker registered for category '{0}'")]
    UnregisteredCategory(Category),

    /// External node declares the wrong number of ports for its category
    #[error("Node '{node}' of category '{category}' needs {expected} but declares {inputs} in / {outputs} out")]
    Arity {
        node: String,
        category: Category,
        expected: &'static str,
        inputs: usize,
        outputs: usize,
    },

    /// Circular dependency detected during topological sort
    #[error("Circular dependency detected: {0:?}")]
    Cycle(Vec<String>),

    /// Nodes with ports left unplugged
    #[error("Graph has unconnected nodes: {0:?}")]
    Disconnected(Vec<String>),

    /// Name not found in the node registry
    #[error("Node '{0}' not found")]
    UnknownName(String),

    /// Name registered twice
    #[error("Node '{0}' is already registered")]
    DuplicateName(String),
}

/// Fatal misuse of a port or a node wrapper
#[derive(Debug, Error, PartialEq)]
pub enum ContractError {
    #[error("Can not get from output port {index} of '{node}'")]
    GetFromOutput { node: String, index: usize },

    #[error("Can not put to input port {index} of '{node}'")]
    PutToInput { node: String, index: usize },

    #[error("{direction} port {index} of '{node}' has no edge")]
    Unplugged {
        node: String,
        direction: Direction,
        index: usize,
    },

    #[error("Edge on input port {index} of '{node}' is empty")]
    EmptyQueue { node: String, index: usize },

    /// Wrapper variant does not match the external node's shape
    #[error("Node '{node}' does not implement the {expected} protocol")]
    ShapeMismatch { node: String, expected: Category },

    /// Batch handler answer does not fit the node's queues
    #[error("Node '{node}' returned a malformed batch: {reason}")]
    MalformedBatch { node: String, reason: String },
}

impl DfpError {
    /// Wrap an external node error
    pub fn node(err: NodeError) -> Self {
        Self::Node(err)
    }
}
