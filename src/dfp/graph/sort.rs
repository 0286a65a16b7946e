//! Topological ordering (Kahn's algorithm)

use std::collections::VecDeque;

use super::{Graph, NodeId};
use crate::dfp::error::ConfigError;

impl Graph {
    /// Return a topological sort of the graph as per Kahn's algorithm
    ///
    /// Nodes without any connection are included. A cycle leaves some nodes
    /// with incoming edges forever and is reported as an error.
    pub fn sort_kahn(&self) -> Result<Vec<NodeId>, ConfigError> {
        let mut incoming = vec![0usize; self.len()];
        for (_, head) in self.connections() {
            incoming[head.index()] += 1;
        }

        let mut seeds: VecDeque<NodeId> = self
            .node_ids()
            .filter(|id| incoming[id.index()] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.len());

        while let Some(tail) = seeds.pop_front() {
            order.push(tail);
            for head in self.successors(tail) {
                incoming[head.index()] -= 1;
                if incoming[head.index()] == 0 {
                    seeds.push_back(*head);
                }
            }
        }

        if order.len() < self.len() {
            let stuck: Vec<String> = self
                .node_ids()
                .filter(|id| incoming[id.index()] > 0)
                .filter_map(|id| self.node(id).map(|n| n.ident().to_string()))
                .collect();
            log::error!("Graph: cycle through {:?}", stuck);
            return Err(ConfigError::Cycle(stuck));
        }
        Ok(order)
    }
}
