// MCP protocol surface: JSON-RPC envelopes, tool registry and method dispatch
pub mod handler;
pub mod protocol;
pub mod registry;

pub use handler::handle_mcp_request;
pub use registry::{Resource, ToolRegistry, ToolRegistryBuilder};
