// SPDX-License-Identifier: MIT

//! Node factory - wraps external nodes into graph nodes
//!
//! Makers are bound per [`Category`]. Wrappers are memoized by graph and
//! external node identity, so a node referenced from several connections
//! is wired through a single wrapper and its edges are shared correctly.
//! Wrapping the same node into another graph builds a separate wrapper.

use std::collections::HashMap;
use std::rc::Rc;

use super::error::ConfigError;
use super::graph::{Graph, GraphId, NodeId};
use super::node::{Node, NodeKind};
use super::protocol::{Category, SharedNode};

/// Builds a wrapper around an external node
pub type Maker = fn(&SharedNode) -> Result<Node, ConfigError>;

/// Factory for creating graph nodes from external nodes
pub struct Factory {
    makers: HashMap<Category, Maker>,
    nodes: HashMap<(GraphId, *const ()), NodeId>,
}

impl Factory {
    /// Factory with a maker bound for every category
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.bind_maker(Category::Source, make_source);
        factory.bind_maker(Category::Sink, make_sink);
        factory.bind_maker(Category::Function, make_function);
        factory.bind_maker(Category::Expander, make_expander);
        factory.bind_maker(Category::Join, make_join);
        factory.bind_maker(Category::Hydra, make_hydra);
        factory
    }

    /// Factory with no makers bound
    pub fn empty() -> Self {
        Self {
            makers: HashMap::new(),
            nodes: HashMap::new(),
        }
    }

    pub fn bind_maker(&mut self, category: Category, maker: Maker) {
        self.makers.insert(category, maker);
    }

    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self.makers.keys().copied().collect();
        categories.sort_by_key(|c| c.to_string());
        categories
    }

    /// Return the graph node wrapping `node`, building and adding it on
    /// first use
    ///
    /// `None` stands for a handle that could not be resolved.
    pub fn wrap(
        &mut self,
        graph: &mut Graph,
        node: Option<&SharedNode>,
    ) -> Result<NodeId, ConfigError> {
        let node = node.ok_or(ConfigError::NullNode)?;
        let key = (graph.id(), Rc::as_ptr(node) as *const ());
        if let Some(id) = self.nodes.get(&key) {
            return Ok(*id);
        }

        let category = node.borrow().category();
        let maker = self
            .makers
            .get(&category)
            .ok_or(ConfigError::UnregisteredCategory(category))?;
        let wrapper = maker(node)?;
        log::info!(
            "Built {} node '{}' with {} in / {} out",
            category,
            wrapper.ident(),
            wrapper.input_ports().len(),
            wrapper.output_ports().len()
        );

        let id = graph.add_node(wrapper);
        self.nodes.insert(key, id);
        Ok(id)
    }

    /// Number of wrappers built so far, across every graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

fn build(node: &SharedNode, kind: NodeKind) -> Result<Node, ConfigError> {
    let (ident, input_types, output_types) = {
        let node = node.borrow();
        (node.ident(), node.input_types(), node.output_types())
    };
    Node::new(ident, kind, node.clone(), input_types, output_types)
}

fn make_source(node: &SharedNode) -> Result<Node, ConfigError> {
    build(node, NodeKind::Source { exhausted: false })
}

fn make_sink(node: &SharedNode) -> Result<Node, ConfigError> {
    build(node, NodeKind::Sink)
}

fn make_function(node: &SharedNode) -> Result<Node, ConfigError> {
    build(node, NodeKind::Function)
}

fn make_expander(node: &SharedNode) -> Result<Node, ConfigError> {
    build(node, NodeKind::Expander)
}

fn make_join(node: &SharedNode) -> Result<Node, ConfigError> {
    build(node, NodeKind::Join)
}

fn make_hydra(node: &SharedNode) -> Result<Node, ConfigError> {
    build(node, NodeKind::Hydra)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dfp::data::{Data, Signature};
    use crate::dfp::error::NodeError;
    use crate::dfp::protocol::{shared, ExternalNode, SinkNode, SourceNode};

    struct Declared {
        category: Category,
        inputs: usize,
        outputs: usize,
    }

    impl Declared {
        fn new(category: Category, inputs: usize, outputs: usize) -> SharedNode {
            shared(Self {
                category,
                inputs,
                outputs,
            })
        }
    }

    impl ExternalNode for Declared {
        fn ident(&self) -> String {
            format!("declared-{}", self.category)
        }

        fn category(&self) -> Category {
            self.category
        }

        fn input_types(&self) -> Vec<Signature> {
            vec![Signature::new("IFrame"); self.inputs]
        }

        fn output_types(&self) -> Vec<Signature> {
            vec![Signature::new("IFrame"); self.outputs]
        }

        fn as_source(&mut self) -> Option<&mut dyn SourceNode> {
            Some(self)
        }

        fn as_sink(&mut self) -> Option<&mut dyn SinkNode> {
            Some(self)
        }
    }

    impl SourceNode for Declared {
        fn produce(&mut self) -> Result<Option<Data>, NodeError> {
            Ok(None)
        }
    }

    impl SinkNode for Declared {
        fn consume(&mut self, _data: Data) -> Result<bool, NodeError> {
            Ok(true)
        }
    }

    #[test]
    fn test_wrap_is_memoized() {
        let mut factory = Factory::new();
        let mut graph = Graph::new();
        let node = Declared::new(Category::Source, 0, 1);

        let first = factory.wrap(&mut graph, Some(&node)).unwrap();
        let second = factory.wrap(&mut graph, Some(&node.clone())).unwrap();
        assert_eq!(first, second);
        assert_eq!(graph.len(), 1);
        assert_eq!(factory.len(), 1);
    }

    #[test]
    fn test_distinct_nodes_get_distinct_wrappers() {
        let mut factory = Factory::new();
        let mut graph = Graph::new();
        let a = Declared::new(Category::Source, 0, 1);
        let b = Declared::new(Category::Source, 0, 1);

        let ia = factory.wrap(&mut graph, Some(&a)).unwrap();
        let ib = factory.wrap(&mut graph, Some(&b)).unwrap();
        assert_ne!(ia, ib);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_ports_follow_declared_types() {
        let mut factory = Factory::new();
        let mut graph = Graph::new();
        let node = Declared::new(Category::Hydra, 3, 2);

        let id = factory.wrap(&mut graph, Some(&node)).unwrap();
        let wrapper = graph.node(id).unwrap();
        assert_eq!(wrapper.category(), Category::Hydra);
        assert_eq!(wrapper.ident(), "declared-hydra");
        assert_eq!(wrapper.input_ports().len(), 3);
        assert_eq!(wrapper.output_ports().len(), 2);
        assert_eq!(wrapper.input_ports()[2].index(), 2);
        assert_eq!(wrapper.input_ports()[0].signature().as_str(), "IFrame");
    }

    #[test]
    fn test_null_handle_fails() {
        let mut factory = Factory::new();
        let mut graph = Graph::new();
        assert_eq!(
            factory.wrap(&mut graph, None).unwrap_err(),
            ConfigError::NullNode
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_unregistered_category_fails() {
        let mut factory = Factory::empty();
        factory.bind_maker(Category::Source, make_source);
        let mut graph = Graph::new();
        let sink = Declared::new(Category::Sink, 1, 0);

        assert_eq!(
            factory.wrap(&mut graph, Some(&sink)).unwrap_err(),
            ConfigError::UnregisteredCategory(Category::Sink)
        );
        assert!(graph.is_empty());
    }

    #[test]
    fn test_wrong_arity_fails() {
        let mut factory = Factory::new();
        let mut graph = Graph::new();
        let bad = Declared::new(Category::Source, 1, 1);

        let err = factory.wrap(&mut graph, Some(&bad)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Arity {
                category: Category::Source,
                inputs: 1,
                outputs: 1,
                ..
            }
        ));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_wrap_into_second_graph_builds_new_wrapper() {
        let mut factory = Factory::new();
        let mut first = Graph::new();
        let mut second = Graph::new();
        let other = Declared::new(Category::Sink, 1, 0);
        let node = Declared::new(Category::Source, 0, 1);

        factory.wrap(&mut first, Some(&other)).unwrap();
        let in_first = factory.wrap(&mut first, Some(&node)).unwrap();
        let in_second = factory.wrap(&mut second, Some(&node)).unwrap();

        assert_eq!(second.len(), 1);
        let wrapper = second.node(in_second).unwrap();
        assert!(Rc::ptr_eq(wrapper.handle(), &node));
        assert_eq!(factory.wrap(&mut first, Some(&node)).unwrap(), in_first);
        assert_eq!(factory.wrap(&mut second, Some(&node)).unwrap(), in_second);
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_all_categories_bound() {
        assert_eq!(Factory::new().categories().len(), Category::ALL.len());
        assert!(Factory::empty().categories().is_empty());
    }
}
