// SPDX-License-Identifier: MIT

//! Sink built-ins

use std::cell::RefCell;
use std::rc::Rc;

use crate::dfp::{Category, Data, ExternalNode, NodeError, Signature, SinkNode};

use super::{expect_int, int};

/// Prints each value to stdout and keeps a record of what it saw
pub struct Print {
    name: String,
    prefix: String,
    values: Rc<RefCell<Vec<i64>>>,
}

impl Print {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            values: Rc::default(),
        }
    }

    /// Shared handle on the values received so far
    pub fn values(&self) -> Rc<RefCell<Vec<i64>>> {
        self.values.clone()
    }
}

impl ExternalNode for Print {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Sink
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![]
    }

    fn as_sink(&mut self) -> Option<&mut dyn SinkNode> {
        Some(self)
    }
}

impl SinkNode for Print {
    fn consume(&mut self, data: Data) -> Result<bool, NodeError> {
        let value = expect_int(&data)?;
        log::debug!("Sink '{}' received {}", self.name, value);
        println!("{}{}", self.prefix, value);
        self.values.borrow_mut().push(value);
        Ok(true)
    }
}

/// Records each value without printing it
pub struct Collect {
    name: String,
    values: Rc<RefCell<Vec<i64>>>,
}

impl Collect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Rc::default(),
        }
    }

    /// Shared handle on the values received so far
    pub fn values(&self) -> Rc<RefCell<Vec<i64>>> {
        self.values.clone()
    }
}

impl ExternalNode for Collect {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Sink
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![]
    }

    fn as_sink(&mut self) -> Option<&mut dyn SinkNode> {
        Some(self)
    }
}

impl SinkNode for Collect {
    fn consume(&mut self, data: Data) -> Result<bool, NodeError> {
        let value = expect_int(&data)?;
        log::debug!("Sink '{}' received {}", self.name, value);
        self.values.borrow_mut().push(value);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_records_values() {
        let mut print = Print::new("out", "> ");
        let seen = print.values();
        assert!(print.consume(Data::new(1i64)).unwrap());
        assert!(print.consume(Data::new(2i64)).unwrap());
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_print_rejects_wrong_payload() {
        let mut print = Print::new("out", "");
        assert!(print.consume(Data::new("two")).is_err());
        assert!(print.values().borrow().is_empty());
    }

    #[test]
    fn test_collect_records_in_order() {
        let mut collect = Collect::new("bag");
        let seen = collect.values();
        for v in [3i64, 1, 2] {
            assert!(collect.consume(Data::new(v)).unwrap());
        }
        assert_eq!(*seen.borrow(), vec![3, 1, 2]);
        assert!(collect.consume(Data::new(1.5f64)).is_err());
        assert_eq!(seen.borrow().len(), 3);
    }
}
