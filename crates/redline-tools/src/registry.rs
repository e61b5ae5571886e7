//! Tool registry.

use crate::BoxedTool;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of available tools.
pub struct ToolRegistry {
    tools: HashMap<String, BoxedTool>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry with the document tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        registry.register(Arc::new(crate::read::ReadTool));
        registry.register(Arc::new(crate::edit::EditTool));
        registry.register(Arc::new(crate::status::StatusTool));

        registry
    }

    /// Register a tool, replacing any tool with the same ID.
    pub fn register(&mut self, tool: BoxedTool) {
        self.tools.insert(tool.id().to_string(), tool);
    }

    /// Get a tool by ID.
    pub fn get(&self, id: &str) -> Option<&BoxedTool> {
        self.tools.get(id)
    }

    /// List all tool IDs, sorted.
    pub fn list(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Get all tools in ID order.
    pub fn all(&self) -> Vec<&BoxedTool> {
        let mut tools: Vec<&BoxedTool> = self.tools.values().collect();
        tools.sort_by(|a, b| a.id().cmp(b.id()));
        tools
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins() {
        let registry = ToolRegistry::with_builtins();
        assert_eq!(registry.list(), vec!["edit", "read", "status"]);
        assert!(registry.get("read").is_some());
        assert!(registry.get("write").is_none());
    }

    #[test]
    fn test_all_is_sorted() {
        let registry = ToolRegistry::with_builtins();
        let ids: Vec<&str> = registry.all().iter().map(|t| t.id()).collect();
        assert_eq!(ids, registry.list());
    }

    #[test]
    fn test_empty() {
        let registry = ToolRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }
}
