// SPDX-License-Identifier: MIT

//! Dataflow process graph
//!
//! A [`Graph`] owns its nodes in an arena and records every connection in
//! creation order. Edges are allocated only by [`Graph::connect`]; running
//! the graph moves items between existing edges and never reshapes it.

mod executor;
mod sort;

pub use executor::ExecutionReport;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::ConfigError;
use super::node::Node;
use super::port::{Direction, Edge, Port, Queue};

/// Index of a node inside its graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

static NEXT_GRAPH_ID: AtomicUsize = AtomicUsize::new(0);

/// Process-unique identity of a graph
///
/// [`NodeId`]s are only meaningful within the graph that issued them, so
/// anything caching ids across calls keys them by this as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(usize);

impl GraphId {
    fn next() -> Self {
        Self(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A directed graph of nodes linked by queued edges
#[derive(Debug)]
pub struct Graph {
    id: GraphId,
    nodes: Vec<Node>,
    /// (tail, head) pairs in creation order
    edges: Vec<(NodeId, NodeId)>,
    forward: HashMap<NodeId, Vec<NodeId>>,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            id: GraphId::next(),
            nodes: Vec::new(),
            edges: Vec::new(),
            forward: HashMap::new(),
        }
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    /// Take ownership of a node and return its id
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        log::debug!("Graph: added node {} '{}'", id, node.ident());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Connections in creation order
    pub fn connections(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Connect output port `tail_port` of `tail` to input port `head_port`
    /// of `head` through a fresh edge
    ///
    /// Nothing is allocated when the connection is rejected.
    pub fn connect(
        &mut self,
        tail: NodeId,
        head: NodeId,
        tail_port: usize,
        head_port: usize,
    ) -> Result<(), ConfigError> {
        let tport = self.port_check(tail, Direction::Output, tail_port)?;
        let hport = self.port_check(head, Direction::Input, head_port)?;

        let tsig = tport.signature();
        let hsig = hport.signature();
        if tsig != hsig {
            log::error!(
                "Graph: port signature mismatch: \"{}\" != \"{}\"",
                tsig,
                hsig
            );
            return Err(ConfigError::SignatureMismatch {
                tail: tsig.to_string(),
                head: hsig.to_string(),
            });
        }
        log::debug!(
            "Graph::connect: {}:{} --> {}:{}",
            tsig,
            tail_port,
            hsig,
            head_port
        );

        let edge: Edge = Rc::new(RefCell::new(Queue::new()));
        self.nodes[tail.0].output_ports_mut()[tail_port].plug(edge.clone());
        self.nodes[head.0].input_ports_mut()[head_port].plug(edge);

        self.edges.push((tail, head));
        self.forward.entry(tail).or_default().push(head);
        Ok(())
    }

    /// True when every port of every node is plugged
    pub fn connected(&self) -> bool {
        self.nodes.iter().all(Node::connected)
    }

    /// Idents of nodes that still have an unplugged port
    pub fn unconnected(&self) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|n| !n.connected())
            .map(|n| n.ident().to_string())
            .collect()
    }

    /// Total number of items waiting on edges
    pub fn queued(&self) -> usize {
        self.nodes
            .iter()
            .flat_map(|n| n.output_ports())
            .map(|p| p.size())
            .sum()
    }

    pub(crate) fn successors(&self, id: NodeId) -> &[NodeId] {
        self.forward.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn port_check(
        &self,
        id: NodeId,
        direction: Direction,
        index: usize,
    ) -> Result<&Port, ConfigError> {
        let node = self.node(id).ok_or(ConfigError::UnknownNode(id.0))?;
        let ports = match direction {
            Direction::Input => node.input_ports(),
            Direction::Output => node.output_ports(),
        };
        let port = ports.get(index).ok_or_else(|| ConfigError::PortOutOfRange {
            node: node.ident().to_string(),
            direction,
            index,
            count: ports.len(),
        })?;
        if port.is_plugged() {
            return Err(ConfigError::PortInUse {
                node: node.ident().to_string(),
                direction,
                index,
            });
        }
        Ok(port)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::dfp::data::{Data, Signature};
    use crate::dfp::error::NodeError;
    use crate::dfp::node::NodeKind;
    use crate::dfp::protocol::{shared, Category, ExternalNode, FunctionNode, SinkNode, SourceNode};

    /// Source of i64 values that records nothing
    pub(crate) struct Counter {
        pub next: i64,
        pub end: i64,
    }

    impl ExternalNode for Counter {
        fn category(&self) -> Category {
            Category::Source
        }

        fn input_types(&self) -> Vec<Signature> {
            vec![]
        }

        fn output_types(&self) -> Vec<Signature> {
            vec![Signature::of::<i64>()]
        }

        fn as_source(&mut self) -> Option<&mut dyn SourceNode> {
            Some(self)
        }
    }

    impl SourceNode for Counter {
        fn produce(&mut self) -> Result<Option<Data>, NodeError> {
            if self.next >= self.end {
                return Ok(None);
            }
            self.next += 1;
            Ok(Some(Data::new(self.next - 1)))
        }
    }

    /// Identity function over i64
    pub(crate) struct Identity;

    impl ExternalNode for Identity {
        fn category(&self) -> Category {
            Category::Function
        }

        fn input_types(&self) -> Vec<Signature> {
            vec![Signature::of::<i64>()]
        }

        fn output_types(&self) -> Vec<Signature> {
            vec![Signature::of::<i64>()]
        }

        fn as_function(&mut self) -> Option<&mut dyn FunctionNode> {
            Some(self)
        }
    }

    impl FunctionNode for Identity {
        fn call(&mut self, input: Data) -> Result<Option<Data>, NodeError> {
            Ok(Some(input))
        }
    }

    /// Sink recording the i64 values it receives
    pub(crate) struct Recorder {
        pub values: Rc<RefCell<Vec<i64>>>,
    }

    impl ExternalNode for Recorder {
        fn category(&self) -> Category {
            Category::Sink
        }

        fn input_types(&self) -> Vec<Signature> {
            vec![Signature::of::<i64>()]
        }

        fn output_types(&self) -> Vec<Signature> {
            vec![]
        }

        fn as_sink(&mut self) -> Option<&mut dyn SinkNode> {
            Some(self)
        }
    }

    impl SinkNode for Recorder {
        fn consume(&mut self, data: Data) -> Result<bool, NodeError> {
            let value = data.cloned::<i64>().ok_or("expected i64")?;
            self.values.borrow_mut().push(value);
            Ok(true)
        }
    }

    pub(crate) fn counter(graph: &mut Graph, name: &str, end: i64) -> NodeId {
        graph.add_node(
            Node::new(
                name,
                NodeKind::Source { exhausted: false },
                shared(Counter { next: 0, end }),
                vec![],
                vec![Signature::of::<i64>()],
            )
            .unwrap(),
        )
    }

    pub(crate) fn identity(graph: &mut Graph, name: &str) -> NodeId {
        graph.add_node(
            Node::new(
                name,
                NodeKind::Function,
                shared(Identity),
                vec![Signature::of::<i64>()],
                vec![Signature::of::<i64>()],
            )
            .unwrap(),
        )
    }

    pub(crate) fn recorder(graph: &mut Graph, name: &str) -> (NodeId, Rc<RefCell<Vec<i64>>>) {
        let values = Rc::new(RefCell::new(Vec::new()));
        let id = graph.add_node(
            Node::new(
                name,
                NodeKind::Sink,
                shared(Recorder {
                    values: values.clone(),
                }),
                vec![Signature::of::<i64>()],
                vec![],
            )
            .unwrap(),
        );
        (id, values)
    }

    fn stringer(graph: &mut Graph) -> NodeId {
        graph.add_node(
            Node::new(
                "strings",
                NodeKind::Sink,
                shared(Recorder {
                    values: Rc::default(),
                }),
                vec![Signature::of::<String>()],
                vec![],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_connect_plugs_both_ports() {
        let mut graph = Graph::new();
        let src = counter(&mut graph, "src", 3);
        let (sink, _) = recorder(&mut graph, "sink");

        assert!(!graph.connected());
        assert_eq!(graph.unconnected().len(), 2);

        graph.connect(src, sink, 0, 0).unwrap();
        assert!(graph.connected());
        assert_eq!(graph.connections(), &[(src, sink)]);
        assert_eq!(graph.successors(src), &[sink]);
        assert!(graph.successors(sink).is_empty());
    }

    #[test]
    fn test_signature_mismatch_rejected_without_edge() {
        let mut graph = Graph::new();
        let src = counter(&mut graph, "src", 3);
        let sink = stringer(&mut graph);

        let err = graph.connect(src, sink, 0, 0).unwrap_err();
        assert!(matches!(err, ConfigError::SignatureMismatch { .. }));
        assert!(graph.connections().is_empty());
        assert!(!graph.node(src).unwrap().output_ports()[0].is_plugged());
        assert!(!graph.node(sink).unwrap().input_ports()[0].is_plugged());
    }

    #[test]
    fn test_port_index_out_of_range() {
        let mut graph = Graph::new();
        let src = counter(&mut graph, "src", 3);
        let (sink, _) = recorder(&mut graph, "sink");

        let err = graph.connect(src, sink, 1, 0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::PortOutOfRange {
                node: "src".to_string(),
                direction: Direction::Output,
                index: 1,
                count: 1,
            }
        );
        let err = graph.connect(src, sink, 0, 2).unwrap_err();
        assert!(matches!(err, ConfigError::PortOutOfRange { index: 2, .. }));
        assert!(graph.connections().is_empty());
    }

    #[test]
    fn test_port_reuse_rejected() {
        let mut graph = Graph::new();
        let src = counter(&mut graph, "src", 3);
        let (a, _) = recorder(&mut graph, "a");
        let (b, _) = recorder(&mut graph, "b");

        graph.connect(src, a, 0, 0).unwrap();
        let err = graph.connect(src, b, 0, 0).unwrap_err();
        assert!(matches!(err, ConfigError::PortInUse { .. }));
        assert_eq!(graph.connections().len(), 1);
    }

    #[test]
    fn test_unknown_node_rejected() {
        let mut graph = Graph::new();
        let src = counter(&mut graph, "src", 3);
        let err = graph.connect(src, NodeId(7), 0, 0).unwrap_err();
        assert_eq!(err, ConfigError::UnknownNode(7));
    }
}
