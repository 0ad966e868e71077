//! mcpnorm Core Library
//!
//! Normalizes MCP server configurations written in the conventions of
//! different developer tools into one canonical schema.

pub mod config;
pub mod mcp;
pub mod records;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{McpnormConfig, ServerEntry, collect_from_file};

    // Normalization
    pub use crate::mcp::{
        Candidate, Endpoint, NormalizedServerConfig, SkipReason, Transport, classify,
        extract_candidates, normalize_to_array, to_json_array,
    };

    // Records
    pub use crate::records::{
        McpServerRecord, Placeholders, RecordError, collect_configurations,
    };
}
