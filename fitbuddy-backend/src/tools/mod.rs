pub mod builtin;
pub mod registry;
pub mod schema;
pub mod types;

pub use registry::{Tool, ToolRegistry};
pub use types::{
    PropertySchema, ToolContext, ToolDefinition, ToolError, ToolInputSchema, ToolResult,
};
