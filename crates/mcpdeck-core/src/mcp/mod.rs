//! MCP (Model Context Protocol) connection descriptors

pub mod schema;

pub use schema::{McpConnection, TransportKind, validate_url};
