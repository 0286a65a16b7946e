// SPDX-License-Identifier: MIT

//! Graph runner application layer
//!
//! Loads graph descriptions, resolves node names and drives the engine.

pub mod builder;
pub mod loader;
pub mod nodes;
pub mod registry;
pub mod types;

pub use builder::Pgrapher;
pub use loader::GraphLoader;
pub use registry::NodeRegistry;
pub use types::{BuiltinKind, EdgeConfig, Endpoint, GraphConfig, NodeConfig};
