//! Configuration file handling
//!
//! `mcpnorm.toml` lists the stored MCP server records and the placeholder
//! variables substituted into their JSON before normalization.

pub mod parser;
pub mod paths;
pub mod schema;

use std::path::Path;

use anyhow::Result;

pub use parser::{parse_config_file, parse_config_str};
pub use paths::{CONFIG_FILE_NAME, config_path_in, default_config_path};
pub use schema::{McpnormConfig, ServerEntry};

use crate::mcp::NormalizedServerConfig;
use crate::records::collect_configurations;

/// Load a config file and normalize every enabled server it lists.
///
/// `file` references resolve against the config file's directory.
pub fn collect_from_file(path: &Path) -> Result<Vec<NormalizedServerConfig>> {
    let config = parse_config_file(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let records = config.load_records(base_dir)?;
    Ok(collect_configurations(&records, &config.vars))
}
