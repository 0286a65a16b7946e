// SPDX-License-Identifier: MIT

//! Single-threaded dataflow process graph engine
//!
//! This module provides the engine core:
//! - `Port` / `Edge` - directional, typed attachment points sharing FIFO queues
//! - `Node` - wrappers adapting external nodes to one invocation contract
//! - `Graph` - connection checks, topological sort and the pull scheduler
//! - `Factory` - memoizing construction of wrappers by node category

pub mod data;
pub mod error;
pub mod factory;
pub mod graph;
pub mod node;
pub mod port;
pub mod protocol;

pub use data::{Data, Signature};
pub use error::{ConfigError, ContractError, DfpError, NodeError};
pub use factory::Factory;
pub use graph::{ExecutionReport, Graph, GraphId, NodeId};
pub use node::{Node, NodeKind};
pub use port::{Direction, Edge, Port, Queue};
pub use protocol::{
    shared, Category, ExpanderNode, ExternalNode, FunctionNode, HydraNode, HydraOutput,
    JoinNode, SharedNode, SinkNode, SourceNode,
};
