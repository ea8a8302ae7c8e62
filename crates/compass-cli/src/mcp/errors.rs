//! Error handling utilities for MCP server

use compass_core::CompassError;
use rmcp::ErrorData;

/// Helper to convert core errors to MCP errors
pub fn to_mcp_error(message: &str, error: &CompassError) -> ErrorData {
    ErrorData::internal_error(format!("{message}: {error}"), None)
}
