use crate::tools::schema::validate_arguments;
use crate::tools::types::{ToolContext, ToolDefinition, ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool definition for the AI API
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with arguments that already passed schema validation
    async fn execute(&self, params: Value, context: &ToolContext) -> ToolResult;

    /// Returns the tool's name
    fn name(&self) -> String {
        self.definition().name
    }
}

/// The set of tools bound to one agent.
///
/// Registration order is preserved so definitions reach the engine in a
/// stable order. Names are unique; the set is not modified after the owning
/// agent is built.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry { tools: Vec::new() }
    }

    /// Register a tool, rejecting a second tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name();
        if self.has_tool(&name) {
            return Err(ToolError::DuplicateTool(name));
        }
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Result<Self, ToolError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Get tool definitions in registration order (for sending to AI)
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Validate arguments and execute a tool by name.
    ///
    /// Unknown tools and schema failures come back as error results rather
    /// than faults so the engine can see them and retry.
    pub async fn execute(&self, name: &str, params: Value, context: &ToolContext) -> ToolResult {
        let tool = match self.get(name) {
            Some(t) => t,
            None => {
                log::warn!("[TOOLS] {} requested unknown tool '{}'", context.agent, name);
                return ToolError::UnknownTool(name.to_string()).into();
            }
        };

        let params = match validate_arguments(&tool.definition(), params) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("[TOOLS] Rejected arguments for '{}': {}", name, e);
                return e.into();
            }
        };

        log::debug!("[TOOLS] Executing '{}' with params: {}", name, params);
        let start = Instant::now();
        let result = tool.execute(params, context).await;
        log::info!(
            "[TOOLS] Tool '{}' executed for {} in {}ms, success: {}",
            name,
            context.agent,
            start.elapsed().as_millis(),
            result.success
        );
        result
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.iter().any(|t| t.name() == name)
    }

    /// Get count of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::types::{PropertySchema, ToolInputSchema};
    use serde_json::json;

    struct MockTool {
        definition: ToolDefinition,
    }

    impl MockTool {
        fn new(name: &str) -> Self {
            MockTool {
                definition: ToolDefinition {
                    name: name.to_string(),
                    description: format!("Mock {} tool", name),
                    input_schema: ToolInputSchema::default()
                        .property("query", PropertySchema::string("query"), true),
                },
            }
        }
    }

    #[async_trait]
    impl Tool for MockTool {
        fn definition(&self) -> ToolDefinition {
            self.definition.clone()
        }

        async fn execute(&self, params: Value, _context: &ToolContext) -> ToolResult {
            ToolResult::success(format!("echo: {}", params["query"].as_str().unwrap_or("")))
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("test_tool"))).unwrap();

        assert!(registry.has_tool("test_tool"));
        assert!(!registry.has_tool("nonexistent"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("test_tool").is_some());
    }

    #[test]
    fn test_registry_rejects_duplicate_names() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("dup"))).unwrap();
        let err = registry.register(Arc::new(MockTool::new("dup"))).unwrap_err();

        assert_eq!(err, ToolError::DuplicateTool("dup".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(MockTool::new("zeta")))
            .and_then(|r| r.with_tool(Arc::new(MockTool::new("alpha"))))
            .unwrap();

        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_execute_unknown_tool_is_error_result() {
        let registry = ToolRegistry::new();
        let result = registry
            .execute("missing", json!({}), &ToolContext::default())
            .await;

        assert!(!result.success);
        assert!(result.content.contains("not found"));
    }

    #[tokio::test]
    async fn test_execute_validates_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(MockTool::new("echo"))).unwrap();

        let result = registry
            .execute("echo", json!({"query": 5}), &ToolContext::default())
            .await;
        assert!(!result.success);
        assert!(result.content.contains("Invalid arguments for tool 'echo'"));

        let result = registry
            .execute("echo", json!({"query": "hi"}), &ToolContext::default())
            .await;
        assert!(result.success);
        assert_eq!(result.content, "echo: hi");
    }
}
