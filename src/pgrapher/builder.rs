// SPDX-License-Identifier: MIT

//! Graph runner - wires a graph description into an engine graph
//!
//! The [`Pgrapher`] resolves node names through a [`NodeRegistry`], wraps
//! them through a memoizing [`Factory`], connects every edge in order and
//! checks the result before anything runs.

use crate::dfp::{ConfigError, DfpError, ExecutionReport, Factory, Graph, NodeId};
use crate::pgrapher::registry::NodeRegistry;
use crate::pgrapher::types::{Endpoint, GraphConfig};

/// Builds and runs one graph from a description
pub struct Pgrapher {
    graph: Graph,
    factory: Factory,
}

impl Pgrapher {
    pub fn new() -> Self {
        Self::with_factory(Factory::new())
    }

    pub fn with_factory(factory: Factory) -> Self {
        Self {
            graph: Graph::new(),
            factory,
        }
    }

    /// Wire every edge of the description
    ///
    /// Fails on the first bad edge, on any port left unplugged and on
    /// cycles, so that configuration errors surface before execution.
    pub fn configure(
        &mut self,
        config: &GraphConfig,
        registry: &NodeRegistry,
    ) -> Result<(), ConfigError> {
        for edge in &config.edges {
            let tail = self.resolve(&edge.tail, registry)?;
            let head = self.resolve(&edge.head, registry)?;

            log::debug!(
                "Connecting {}:{} -> {}:{}",
                edge.tail.node,
                edge.tail.port,
                edge.head.node,
                edge.head.port
            );
            if let Err(e) = self
                .graph
                .connect(tail, head, edge.tail.port, edge.head.port)
            {
                log::error!("Failed to connect edge {:?}: {}", edge, e);
                return Err(e);
            }
        }

        let unconnected = self.graph.unconnected();
        if !unconnected.is_empty() {
            return Err(ConfigError::Disconnected(unconnected));
        }
        self.graph.sort_kahn()?;

        log::info!(
            "Configured graph '{}' with {} nodes and {} edges",
            config.name,
            self.graph.len(),
            self.graph.connections().len()
        );
        Ok(())
    }

    /// Run the configured graph until it is quiescent
    pub fn execute(&mut self) -> Result<ExecutionReport, DfpError> {
        self.graph.execute()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    fn resolve(
        &mut self,
        endpoint: &Endpoint,
        registry: &NodeRegistry,
    ) -> Result<NodeId, ConfigError> {
        let node = registry.get(&endpoint.node).ok_or_else(|| {
            log::error!("Failed to get node {}", endpoint.node);
            ConfigError::UnknownName(endpoint.node.clone())
        })?;
        self.factory.wrap(&mut self.graph, Some(&node))
    }
}

impl Default for Pgrapher {
    fn default() -> Self {
        Self::new()
    }
}
