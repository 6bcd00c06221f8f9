use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Schema for a single tool argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(rename = "exclusiveMinimum", skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<f64>,
}

impl PropertySchema {
    fn of_type(schema_type: &str, description: impl Into<String>) -> Self {
        PropertySchema {
            schema_type: schema_type.to_string(),
            description: description.into(),
            default: None,
            enum_values: None,
            exclusive_minimum: None,
        }
    }

    pub fn string(description: impl Into<String>) -> Self {
        Self::of_type("string", description)
    }

    pub fn number(description: impl Into<String>) -> Self {
        Self::of_type("number", description)
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self::of_type("integer", description)
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    /// Require the value to be strictly greater than zero
    pub fn positive(mut self) -> Self {
        self.exclusive_minimum = Some(0.0);
        self
    }
}

/// JSON-schema object describing a tool's arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl Default for ToolInputSchema {
    fn default() -> Self {
        ToolInputSchema {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: vec![],
        }
    }
}

impl ToolInputSchema {
    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// Tool definition advertised to the generation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolInputSchema,
}

/// Outcome of a tool execution. Exactly one of value or error payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub content: String,
}

impl ToolResult {
    pub fn success(content: impl Into<String>) -> Self {
        ToolResult {
            success: true,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        ToolResult {
            success: false,
            content: content.into(),
        }
    }
}

impl From<ToolError> for ToolResult {
    fn from(error: ToolError) -> Self {
        ToolResult::error(error.to_string())
    }
}

/// Where a tool is being executed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContext {
    /// Agent whose invocation requested the call
    pub agent: String,
    /// Invocation that requested the call
    pub invocation_id: String,
    /// Nesting depth; 0 for a top-level invocation
    pub depth: usize,
}

impl ToolContext {
    pub fn new(agent: impl Into<String>, invocation_id: impl Into<String>, depth: usize) -> Self {
        ToolContext {
            agent: agent.into(),
            invocation_id: invocation_id.into(),
            depth,
        }
    }
}

impl Default for ToolContext {
    fn default() -> Self {
        ToolContext::new("test", "test-invocation", 0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolError {
    /// The engine asked for a tool that isn't bound to this agent
    UnknownTool(String),
    /// Arguments failed the tool's declared schema
    InvalidArguments { tool: String, reason: String },
    /// Arguments were well-formed but semantically rejected
    Domain(String),
    /// Two tools with the same name were bound to one agent
    DuplicateTool(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::UnknownTool(name) => write!(f, "Error: Tool '{}' not found", name),
            ToolError::InvalidArguments { tool, reason } => {
                write!(f, "Error: Invalid arguments for tool '{}': {}", tool, reason)
            }
            ToolError::Domain(message) => write!(f, "Error: {}", message),
            ToolError::DuplicateTool(name) => {
                write!(f, "Error: Tool '{}' is already registered", name)
            }
        }
    }
}

impl std::error::Error for ToolError {}
