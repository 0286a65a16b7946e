// SPDX-License-Identifier: MIT

//! Arithmetic built-ins: one node per transform shape

use crate::dfp::{
    Category, Data, ExpanderNode, ExternalNode, FunctionNode, HydraNode, HydraOutput, JoinNode,
    NodeError, Signature,
};

use super::{expect_int, int};

/// Multiplies each value by a constant
pub struct Scale {
    name: String,
    factor: i64,
}

impl Scale {
    pub fn new(name: impl Into<String>, factor: i64) -> Self {
        Self {
            name: name.into(),
            factor,
        }
    }
}

impl ExternalNode for Scale {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Function
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn as_function(&mut self) -> Option<&mut dyn FunctionNode> {
        Some(self)
    }
}

impl FunctionNode for Scale {
    fn call(&mut self, input: Data) -> Result<Option<Data>, NodeError> {
        let value = expect_int(&input)?;
        let scaled = value
            .checked_mul(self.factor)
            .ok_or_else(|| format!("{} * {} overflows", value, self.factor))?;
        Ok(Some(Data::new(scaled)))
    }
}

/// Emits every value `times` times
pub struct Repeat {
    name: String,
    times: usize,
}

impl Repeat {
    pub fn new(name: impl Into<String>, times: usize) -> Self {
        Self {
            name: name.into(),
            times,
        }
    }
}

impl ExternalNode for Repeat {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Expander
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn as_expander(&mut self) -> Option<&mut dyn ExpanderNode> {
        Some(self)
    }
}

impl ExpanderNode for Repeat {
    fn expand(&mut self, input: Data) -> Result<Option<Vec<Data>>, NodeError> {
        Ok(Some(vec![input; self.times]))
    }
}

/// Adds one value from each input
pub struct Sum {
    name: String,
    inputs: usize,
}

impl Sum {
    pub fn new(name: impl Into<String>, inputs: usize) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }
}

impl ExternalNode for Sum {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Join
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![int(); self.inputs]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn as_join(&mut self) -> Option<&mut dyn JoinNode> {
        Some(self)
    }
}

impl JoinNode for Sum {
    fn combine(&mut self, inputs: Vec<Data>) -> Result<Option<Data>, NodeError> {
        let mut total = 0i64;
        for input in &inputs {
            let value = expect_int(input)?;
            total = total
                .checked_add(value)
                .ok_or_else(|| format!("{} + {} overflows", total, value))?;
        }
        Ok(Some(Data::new(total)))
    }
}

/// Emits the sum of every adjacent pair, keeping the newest value as
/// lookbehind for the next batch
pub struct Pairwise {
    name: String,
}

impl Pairwise {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ExternalNode for Pairwise {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Hydra
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn as_hydra(&mut self) -> Option<&mut dyn HydraNode> {
        Some(self)
    }
}

impl HydraNode for Pairwise {
    fn process(&mut self, mut inputs: Vec<Vec<Data>>) -> Result<Option<HydraOutput>, NodeError> {
        let queue = inputs.pop().unwrap_or_default();
        if queue.len() < 2 {
            return Ok(None);
        }
        let values = queue
            .iter()
            .map(expect_int)
            .collect::<Result<Vec<i64>, NodeError>>()?;
        let sums = values
            .windows(2)
            .map(|pair| {
                pair[0]
                    .checked_add(pair[1])
                    .map(Data::new)
                    .ok_or_else(|| format!("{} + {} overflows", pair[0], pair[1]).into())
            })
            .collect::<Result<Vec<Data>, NodeError>>()?;
        let residual = queue[queue.len() - 1..].to_vec();

        Ok(Some(HydraOutput {
            residuals: vec![residual],
            outputs: vec![sums],
        }))
    }
}
