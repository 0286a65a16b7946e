// SPDX-License-Identifier: MIT

//! External node protocol
//!
//! Concrete node behaviour lives outside the engine. An external node
//! declares its port signatures and a [`Category`], and implements the one
//! shape trait that category selects. The engine wraps it in a
//! [`Node`](super::node::Node) of the matching variant.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::data::{Data, Signature};
use super::error::NodeError;

/// Invocation shape of an external node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// 0 in / 1 out generator
    Source,
    /// 1 in / 0 out consumer
    Sink,
    /// 1 in / 1 out, one item per item
    Function,
    /// 1 in / 1 out, zero or more items per item
    Expander,
    /// N in / 1 out, one item from each input
    Join,
    /// N in / M out batch combine over whole queues
    Hydra,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Source,
        Category::Sink,
        Category::Function,
        Category::Expander,
        Category::Join,
        Category::Hydra,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Source => "source",
            Category::Sink => "sink",
            Category::Function => "function",
            Category::Expander => "expander",
            Category::Join => "join",
            Category::Hydra => "hydra",
        };
        f.write_str(name)
    }
}

/// Shared handle to an external node
pub type SharedNode = Rc<RefCell<dyn ExternalNode>>;

/// Wrap an external node into a shareable handle
pub fn shared<N: ExternalNode + 'static>(node: N) -> SharedNode {
    Rc::new(RefCell::new(node))
}

/// Core trait for all externally supplied nodes
///
/// Implementors override the accessor matching their category and leave
/// the others at their `None` default.
pub trait ExternalNode {
    /// Diagnostic name
    fn ident(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }

    fn category(&self) -> Category;

    /// Signatures of the input ports, in port order
    fn input_types(&self) -> Vec<Signature>;

    /// Signatures of the output ports, in port order
    fn output_types(&self) -> Vec<Signature>;

    fn as_source(&mut self) -> Option<&mut dyn SourceNode> {
        None
    }

    fn as_sink(&mut self) -> Option<&mut dyn SinkNode> {
        None
    }

    fn as_function(&mut self) -> Option<&mut dyn FunctionNode> {
        None
    }

    fn as_expander(&mut self) -> Option<&mut dyn ExpanderNode> {
        None
    }

    fn as_join(&mut self) -> Option<&mut dyn JoinNode> {
        None
    }

    fn as_hydra(&mut self) -> Option<&mut dyn HydraNode> {
        None
    }
}

/// Generator: `None` signals end of stream
pub trait SourceNode {
    fn produce(&mut self) -> Result<Option<Data>, NodeError>;
}

/// Terminal consumer: returns whether the item was accepted
pub trait SinkNode {
    fn consume(&mut self, data: Data) -> Result<bool, NodeError>;
}

/// One item out for every item in. `None` declines the item.
pub trait FunctionNode {
    fn call(&mut self, input: Data) -> Result<Option<Data>, NodeError>;
}

/// Zero or more items out for every item in. `None` declines the item.
pub trait ExpanderNode {
    fn expand(&mut self, input: Data) -> Result<Option<Vec<Data>>, NodeError>;
}

/// One item from each input, in port order, combined into one output
pub trait JoinNode {
    fn combine(&mut self, inputs: Vec<Data>) -> Result<Option<Data>, NodeError>;
}

/// Result of one batch combine step
#[derive(Debug, Default)]
pub struct HydraOutput {
    /// Unconsumed suffix of each input queue, in port order
    pub residuals: Vec<Vec<Data>>,
    /// Batch appended to each output queue, in port order
    pub outputs: Vec<Vec<Data>>,
}

/// Batch handler that sees the entire contents of every input queue
pub trait HydraNode {
    fn process(&mut self, inputs: Vec<Vec<Data>>) -> Result<Option<HydraOutput>, NodeError>;
}
