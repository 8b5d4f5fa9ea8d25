//! Result helpers for MCP tool responses
//!
//! Tools in this workspace answer with plain text. A failed operation is
//! still a well-formed tool response, flagged with `is_error`, so the
//! calling agent can read the message and correct its request.

use rmcp::model::{CallToolResult, Content};

/// Create a successful plain text response
///
/// ```rust,ignore
/// use mcp_common::text_success;
///
/// text_success("Comment added to sc-704")
/// ```
pub fn text_success(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// Create an error-flagged plain text response
pub fn text_error(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// First text item of a response, if any
pub fn first_text(result: &CallToolResult) -> Option<&str> {
    result
        .content
        .iter()
        .find_map(|content| content.as_text().map(|t| t.text.as_str()))
}
