use crate::ai::{Message, ToolCall};

/// Render one tool call as a human-readable log line
pub fn format_tool_call(call: &ToolCall) -> String {
    format!("🔧 Tool called: `{}`\nArguments: {}", call.name, call.arguments)
}

/// Flatten a conversation into one line per requested tool call, in the
/// order the calls were made. Results are not included.
pub fn extract_tool_logs(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .flat_map(|m| m.pending_tool_calls())
        .map(format_tool_call)
        .collect()
}
