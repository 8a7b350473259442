//! MCP Server Registry
//!
//! Wire schema of third-party registry documents. Records can arrive from an
//! uploaded file, an inline JSON payload or a paginated HTTP endpoint; all
//! three share these types.

mod types;

pub use types::*;
