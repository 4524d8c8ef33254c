// Tool trait and the ordered registry of tool specifications

use crate::validate::ValidatedParams;
use atlasgate_core::{BackendContext, ToolError, ToolResult, ToolSpec};
use std::collections::HashMap;

/// Tool handler trait
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool spec advertised on discovery
    fn spec(&self) -> ToolSpec;

    /// Execute the tool against the backends with validated parameters
    async fn execute(
        &self,
        ctx: &BackendContext,
        params: ValidatedParams,
    ) -> ToolResult<serde_json::Value>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),
}

/// Registry of tool specs.
///
/// Filled once at startup, read-only afterwards. Listing order is
/// registration order.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    specs: Vec<ToolSpec>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool spec
    pub fn register(&mut self, spec: ToolSpec) -> Result<(), RegistryError> {
        if self.index.contains_key(&spec.name) {
            return Err(RegistryError::DuplicateTool(spec.name));
        }
        self.index.insert(spec.name.clone(), self.specs.len());
        self.specs.push(spec);
        Ok(())
    }

    /// Get a tool spec by name
    pub fn get(&self, name: &str) -> ToolResult<&ToolSpec> {
        self.index
            .get(name)
            .map(|&i| &self.specs[i])
            .ok_or_else(|| ToolError::unknown_tool(name))
    }

    /// List all tool specs in registration order
    pub fn list(&self) -> &[ToolSpec] {
        &self.specs
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
