// SPDX-License-Identifier: MIT

//! Node wrappers
//!
//! A [`Node`] adapts one external node to the uniform "attempt one unit of
//! work" contract. The set of invocation shapes is closed, so the adapter
//! is a tagged [`NodeKind`] rather than a trait hierarchy.

use std::rc::Rc;

use super::data::{Data, Signature};
use super::error::{ConfigError, ContractError, DfpError};
use super::port::{Direction, Port};
use super::protocol::{Category, HydraOutput, SharedNode};

/// Invocation shape plus the per-shape state it needs
pub enum NodeKind {
    Source { exhausted: bool },
    Sink,
    Function,
    Expander,
    Join,
    Hydra,
}

impl NodeKind {
    pub fn category(&self) -> Category {
        match self {
            NodeKind::Source { .. } => Category::Source,
            NodeKind::Sink => Category::Sink,
            NodeKind::Function => Category::Function,
            NodeKind::Expander => Category::Expander,
            NodeKind::Join => Category::Join,
            NodeKind::Hydra => Category::Hydra,
        }
    }

    /// Input and output port counts the shape accepts
    fn arity(&self) -> (Arity, Arity, &'static str) {
        match self {
            NodeKind::Source { .. } => (Arity::Exactly(0), Arity::Exactly(1), "0 in / 1 out"),
            NodeKind::Sink => (Arity::Exactly(1), Arity::Exactly(0), "1 in / 0 out"),
            NodeKind::Function | NodeKind::Expander => {
                (Arity::Exactly(1), Arity::Exactly(1), "1 in / 1 out")
            }
            NodeKind::Join => (Arity::AtLeast(1), Arity::Exactly(1), "N in / 1 out"),
            NodeKind::Hydra => (Arity::AtLeast(1), Arity::AtLeast(0), "N in / M out"),
        }
    }
}

enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, n: usize) -> bool {
        match self {
            Arity::Exactly(k) => n == *k,
            Arity::AtLeast(k) => n >= *k,
        }
    }
}

/// A processing unit with fixed input and output port lists
pub struct Node {
    ident: Rc<str>,
    kind: NodeKind,
    handle: SharedNode,
    inputs: Vec<Port>,
    outputs: Vec<Port>,
}

impl Node {
    /// Build a wrapper with one port per declared signature
    ///
    /// Fails with [`ConfigError::Arity`] when the port counts do not fit
    /// the shape, so `ready` and `invoke` never see a missing port.
    pub fn new(
        ident: impl Into<String>,
        kind: NodeKind,
        handle: SharedNode,
        input_types: Vec<Signature>,
        output_types: Vec<Signature>,
    ) -> Result<Self, ConfigError> {
        let ident = ident.into();
        let (inputs, outputs, expected) = kind.arity();
        if !inputs.accepts(input_types.len()) || !outputs.accepts(output_types.len()) {
            return Err(ConfigError::Arity {
                node: ident,
                category: kind.category(),
                expected,
                inputs: input_types.len(),
                outputs: output_types.len(),
            });
        }

        let ident: Rc<str> = Rc::from(ident);
        let ports = |direction, types: Vec<Signature>| -> Vec<Port> {
            types
                .into_iter()
                .enumerate()
                .map(|(index, sig)| Port::new(ident.clone(), direction, index, sig))
                .collect()
        };
        let inputs = ports(Direction::Input, input_types);
        let outputs = ports(Direction::Output, output_types);

        Ok(Self {
            ident,
            kind,
            handle,
            inputs,
            outputs,
        })
    }

    pub fn ident(&self) -> &str {
        &self.ident
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn handle(&self) -> &SharedNode {
        &self.handle
    }

    pub fn input_ports(&self) -> &[Port] {
        &self.inputs
    }

    pub fn output_ports(&self) -> &[Port] {
        &self.outputs
    }

    pub(crate) fn input_ports_mut(&mut self) -> &mut [Port] {
        &mut self.inputs
    }

    pub(crate) fn output_ports_mut(&mut self) -> &mut [Port] {
        &mut self.outputs
    }

    /// True when every port has an edge plugged in
    pub fn connected(&self) -> bool {
        self.inputs
            .iter()
            .chain(self.outputs.iter())
            .all(Port::is_plugged)
    }

    /// Cheap check whether invoking could make progress
    pub fn ready(&self) -> bool {
        match &self.kind {
            NodeKind::Source { exhausted } => !exhausted,
            NodeKind::Sink | NodeKind::Function | NodeKind::Expander => {
                !self.iport().empty()
            }
            NodeKind::Join | NodeKind::Hydra => self.all_inputs_ready(),
        }
    }

    /// Attempt exactly one processing step
    ///
    /// Returns `Ok(false)` when the node cannot progress right now.
    pub fn invoke(&mut self) -> Result<bool, DfpError> {
        match self.kind {
            NodeKind::Source { exhausted } => {
                if exhausted {
                    return Ok(false);
                }
                self.invoke_source()
            }
            NodeKind::Sink => self.invoke_sink(),
            NodeKind::Function => self.invoke_function(),
            NodeKind::Expander => self.invoke_expander(),
            NodeKind::Join => self.invoke_join(),
            NodeKind::Hydra => self.invoke_hydra(),
        }
    }

    fn invoke_source(&mut self) -> Result<bool, DfpError> {
        let produced = {
            let mut handle = self.handle.borrow_mut();
            let source = handle.as_source().ok_or_else(|| self.mismatch())?;
            source.produce().map_err(DfpError::node)?
        };
        match produced {
            Some(data) => {
                self.oport().put(data)?;
                Ok(true)
            }
            None => {
                log::debug!("Source '{}' reached end of stream", self.ident);
                self.kind = NodeKind::Source { exhausted: true };
                Ok(false)
            }
        }
    }

    fn invoke_sink(&mut self) -> Result<bool, DfpError> {
        if self.iport().empty() {
            return Ok(false);
        }
        let mut handle = self.handle.borrow_mut();
        let sink = handle.as_sink().ok_or_else(|| self.mismatch())?;
        let data = self.iport().get(true)?;
        let accepted = sink.consume(data).map_err(DfpError::node)?;
        if !accepted {
            log::trace!("Sink '{}' rejected an item", self.ident);
        }
        Ok(accepted)
    }

    fn invoke_function(&mut self) -> Result<bool, DfpError> {
        if self.iport().empty() {
            return Ok(false);
        }
        let input = self.iport().get(false)?;
        let output = {
            let mut handle = self.handle.borrow_mut();
            let function = handle.as_function().ok_or_else(|| self.mismatch())?;
            function.call(input).map_err(DfpError::node)?
        };
        let Some(output) = output else {
            return Ok(false);
        };
        self.iport().get(true)?;
        self.oport().put(output)?;
        Ok(true)
    }

    fn invoke_expander(&mut self) -> Result<bool, DfpError> {
        if self.iport().empty() {
            return Ok(false);
        }
        let input = self.iport().get(false)?;
        let outputs = {
            let mut handle = self.handle.borrow_mut();
            let expander = handle.as_expander().ok_or_else(|| self.mismatch())?;
            expander.expand(input).map_err(DfpError::node)?
        };
        let Some(outputs) = outputs else {
            return Ok(false);
        };
        self.iport().get(true)?;
        for out in outputs {
            self.oport().put(out)?;
        }
        Ok(true)
    }

    fn invoke_join(&mut self) -> Result<bool, DfpError> {
        if !self.all_inputs_ready() {
            return Ok(false);
        }
        let inputs = self
            .inputs
            .iter()
            .map(|port| port.get(false))
            .collect::<Result<Vec<Data>, ContractError>>()?;
        let output = {
            let mut handle = self.handle.borrow_mut();
            let join = handle.as_join().ok_or_else(|| self.mismatch())?;
            join.combine(inputs).map_err(DfpError::node)?
        };
        let Some(output) = output else {
            return Ok(false);
        };
        for port in &self.inputs {
            port.get(true)?;
        }
        self.oport().put(output)?;
        Ok(true)
    }

    fn invoke_hydra(&mut self) -> Result<bool, DfpError> {
        if !self.all_inputs_ready() {
            return Ok(false);
        }
        let inputs = self
            .inputs
            .iter()
            .map(Port::snapshot)
            .collect::<Result<Vec<Vec<Data>>, ContractError>>()?;
        let answer = {
            let mut handle = self.handle.borrow_mut();
            let hydra = handle.as_hydra().ok_or_else(|| self.mismatch())?;
            hydra.process(inputs).map_err(DfpError::node)?
        };
        let Some(answer) = answer else {
            return Ok(false);
        };
        self.check_batch(&answer)?;

        let mut changed = 0;
        for (port, residual) in self.inputs.iter().zip(&answer.residuals) {
            changed += port.trim_to(residual.len())?;
        }
        for (port, batch) in self.outputs.iter().zip(answer.outputs) {
            changed += batch.len();
            for out in batch {
                port.put(out)?;
            }
        }
        Ok(changed > 0)
    }

    fn check_batch(&self, answer: &HydraOutput) -> Result<(), ContractError> {
        let malformed = |reason: String| ContractError::MalformedBatch {
            node: self.ident.to_string(),
            reason,
        };
        if answer.residuals.len() != self.inputs.len() {
            return Err(malformed(format!(
                "{} residuals for {} inputs",
                answer.residuals.len(),
                self.inputs.len()
            )));
        }
        if answer.outputs.len() != self.outputs.len() {
            return Err(malformed(format!(
                "{} output batches for {} outputs",
                answer.outputs.len(),
                self.outputs.len()
            )));
        }
        for (port, residual) in self.inputs.iter().zip(&answer.residuals) {
            if residual.len() > port.size() {
                return Err(malformed(format!(
                    "residual of {} on input {} holding {}",
                    residual.len(),
                    port.index(),
                    port.size()
                )));
            }
        }
        Ok(())
    }

    fn all_inputs_ready(&self) -> bool {
        !self.inputs.is_empty() && self.inputs.iter().all(|port| !port.empty())
    }

    fn iport(&self) -> &Port {
        &self.inputs[0]
    }

    fn oport(&self) -> &Port {
        &self.outputs[0]
    }

    fn mismatch(&self) -> ContractError {
        ContractError::ShapeMismatch {
            node: self.ident.to_string(),
            expected: self.category(),
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("ident", &self.ident)
            .field("category", &self.category())
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .finish()
    }
}
