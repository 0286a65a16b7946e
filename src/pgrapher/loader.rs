//! Graph loader - YAML and JSON file loading and parsing
//!
//! This module handles loading graph descriptions from files. Files ending
//! in `.json` are read as JSON, everything else as YAML.

use super::types::GraphConfig;
use crate::dfp::DfpError;
use std::fs;
use std::path::Path;

/// Loads graph descriptions from files
pub struct GraphLoader;

impl GraphLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a graph description from a file
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<GraphConfig, DfpError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_yaml(&content)
        }
    }

    /// Parse a graph description from a YAML string
    pub fn parse_yaml(content: &str) -> Result<GraphConfig, DfpError> {
        let def: GraphConfig = serde_yaml::from_str(content)?;
        Ok(def)
    }

    /// Parse a graph description from a JSON string
    pub fn parse_json(content: &str) -> Result<GraphConfig, DfpError> {
        let def: GraphConfig = serde_json::from_str(content)?;
        Ok(def)
    }
}

impl Default for GraphLoader {
    fn default() -> Self {
        Self::new()
    }
}
