use crate::dfp::{Category, Data, ExternalNode, NodeError, Signature, SourceNode};

use super::int;

/// Emits `count` consecutive integers starting at `start`
pub struct Range {
    name: String,
    /// `None` once the next value would pass `i64::MAX`
    next: Option<i64>,
    remaining: u64,
}

impl Range {
    pub fn new(name: impl Into<String>, start: i64, count: u64) -> Self {
        Self {
            name: name.into(),
            next: Some(start),
            remaining: count,
        }
    }
}

impl ExternalNode for Range {
    fn ident(&self) -> String {
        self.name.clone()
    }

    fn category(&self) -> Category {
        Category::Source
    }

    fn input_types(&self) -> Vec<Signature> {
        vec![]
    }

    fn output_types(&self) -> Vec<Signature> {
        vec![int()]
    }

    fn as_source(&mut self) -> Option<&mut dyn SourceNode> {
        Some(self)
    }
}

impl SourceNode for Range {
    fn produce(&mut self) -> Result<Option<Data>, NodeError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let value = self
            .next
            .ok_or_else(|| format!("range '{}' runs past {}", self.name, i64::MAX))?;
        self.remaining -= 1;
        self.next = value.checked_add(1);
        Ok(Some(Data::new(value)))
    }
}
