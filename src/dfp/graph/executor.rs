//! Graph executor
//!
//! Demand-driven scheduling: nodes are visited in reverse topological order
//! so consumers are asked first. A node that cannot progress hands the turn
//! to its upstream neighbour in sort order, and any successful step sends
//! the walk back to the consumer end. Execution ends when a full sweep makes
//! no progress.

use super::Graph;
use crate::dfp::error::DfpError;

/// Counters gathered during one [`Graph::execute`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Walks started from the consumer end
    pub sweeps: usize,
    /// Calls to `invoke` on ready nodes
    pub invocations: usize,
    /// Invocations that made progress
    pub steps: usize,
}

impl Graph {
    /// Execute the graph until nodes stop delivering
    ///
    /// There is no iteration cap: a source that never signals end of stream
    /// keeps the graph running.
    pub fn execute(&mut self) -> Result<ExecutionReport, DfpError> {
        let order = self.sort_kahn()?;
        log::info!("Graph executing with {} nodes", order.len());

        let mut report = ExecutionReport::default();
        loop {
            report.sweeps += 1;
            let mut did_something = false;

            for (count, id) in order.iter().rev().enumerate() {
                let node = self.node_mut(*id);
                if !node.ready() {
                    continue;
                }

                report.invocations += 1;
                if node.invoke()? {
                    log::debug!("Ran node {}: {}", count, node.ident());
                    report.steps += 1;
                    did_something = true;
                    break; // start again from bottom of graph
                }

                // otherwise try upstream following topological sort
                log::trace!("Node {} made no progress: {}", count, node.ident());
            }

            if !did_something {
                break;
            }
        }

        log::info!(
            "Graph quiescent after {} steps ({} invocations, {} sweeps)",
            report.steps,
            report.invocations,
            report.sweeps
        );
        Ok(report)
    }
}
