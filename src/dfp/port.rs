// SPDX-License-Identifier: MIT

//! Ports and edges
//!
//! An edge is a FIFO queue shared by exactly one output port and one input
//! port. Direction checks live here so no node variant can read from its own
//! output or write to its own input.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use super::data::{Data, Signature};
use super::error::ContractError;

/// A buffer of data. Items enter at the back and leave from the front.
pub type Queue = VecDeque<Data>;

/// Edges are queues shared by the two ports plugged into them
pub type Edge = Rc<RefCell<Queue>>;

/// Whether a port receives or emits data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
        }
    }
}

/// A typed, directional attachment point on a node
#[derive(Debug)]
pub struct Port {
    /// Ident of the owning node, for diagnostics only
    owner: Rc<str>,
    direction: Direction,
    index: usize,
    signature: Signature,
    edge: Option<Edge>,
}

impl Port {
    pub fn new(owner: Rc<str>, direction: Direction, index: usize, signature: Signature) -> Self {
        Self {
            owner,
            direction,
            index,
            signature,
            edge: None,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn edge(&self) -> Option<&Edge> {
        self.edge.as_ref()
    }

    pub fn is_plugged(&self) -> bool {
        self.edge.is_some()
    }

    /// Connect an edge, returning any previous one
    pub fn plug(&mut self, edge: Edge) -> Option<Edge> {
        self.edge.replace(edge)
    }

    /// Queue length, or 0 when nothing is plugged
    pub fn size(&self) -> usize {
        self.edge.as_ref().map_or(0, |e| e.borrow().len())
    }

    /// True when the queue is empty or nothing is plugged
    pub fn empty(&self) -> bool {
        self.size() == 0
    }

    /// Take the front item. Pass `pop = false` to peek at it instead.
    pub fn get(&self, pop: bool) -> Result<Data, ContractError> {
        if self.is_output() {
            return Err(ContractError::GetFromOutput {
                node: self.owner.to_string(),
                index: self.index,
            });
        }
        let edge = self.plugged()?;
        let mut queue = edge.borrow_mut();
        let item = if pop {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        item.ok_or_else(|| ContractError::EmptyQueue {
            node: self.owner.to_string(),
            index: self.index,
        })
    }

    /// Append an item to the back of the queue
    pub fn put(&self, data: Data) -> Result<(), ContractError> {
        if self.is_input() {
            return Err(ContractError::PutToInput {
                node: self.owner.to_string(),
                index: self.index,
            });
        }
        self.plugged()?.borrow_mut().push_back(data);
        Ok(())
    }

    /// Copy of the whole queue, front first
    pub(crate) fn snapshot(&self) -> Result<Vec<Data>, ContractError> {
        Ok(self.plugged()?.borrow().iter().cloned().collect())
    }

    /// Drop items from the front until `keep` remain
    pub(crate) fn trim_to(&self, keep: usize) -> Result<usize, ContractError> {
        let edge = self.plugged()?;
        let mut queue = edge.borrow_mut();
        let drop = queue.len().saturating_sub(keep);
        queue.drain(..drop);
        Ok(drop)
    }

    fn plugged(&self) -> Result<&Edge, ContractError> {
        self.edge.as_ref().ok_or_else(|| ContractError::Unplugged {
            node: self.owner.to_string(),
            direction: self.direction,
            index: self.index,
        })
    }
}
