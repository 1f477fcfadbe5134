//! Flow loader - YAML file loading and parsing

use super::types::FlowDefinition;
use crate::error::FlowError;
use std::fs;
use std::path::Path;

/// Loads flow definitions from YAML files
pub struct FlowLoader;

impl FlowLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a flow definition from a YAML file
    pub fn load_flow<P: AsRef<Path>>(&self, path: P) -> Result<FlowDefinition, FlowError> {
        let path = path.as_ref();
        log::debug!("Loading flow definition from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parse a flow definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<FlowDefinition, FlowError> {
        let def: FlowDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }
}

impl Default for FlowLoader {
    fn default() -> Self {
        Self::new()
    }
}
