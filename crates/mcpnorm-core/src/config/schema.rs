//! Configuration schema for mcpnorm.toml
//!
//! ```toml
//! [vars]
//! ERP_HOST = "http://localhost:8080"
//!
//! [[server]]
//! name = "filesystem"
//! file = "fs.json"
//!
//! [[server]]
//! name = "search"
//! enabled = false
//! json = '''{ "url": "@ERP_HOST@/sse" }'''
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::paths::resolve_relative;
use crate::records::{McpServerRecord, Placeholders};

/// Root configuration structure for mcpnorm.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct McpnormConfig {
    /// `@KEY@` substitutions applied to every server's JSON
    #[serde(default, skip_serializing_if = "Placeholders::is_empty")]
    pub vars: Placeholders,

    /// Server records, in output order
    #[serde(default, rename = "server")]
    pub servers: Vec<ServerEntry>,
}

/// One stored MCP server definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerEntry {
    /// Record name, used as the default server name
    pub name: String,

    /// Disabled entries are kept in the file but not emitted
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Inline JSON configuration text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,

    /// JSON file, relative to the config file's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_enabled() -> bool {
    true
}

impl ServerEntry {
    /// Raw JSON text for this entry, reading `file` if needed.
    pub fn load_json(&self, base_dir: &Path) -> anyhow::Result<String> {
        match (&self.json, &self.file) {
            (Some(json), None) => Ok(json.clone()),
            (None, Some(file)) => {
                let path = resolve_relative(base_dir, file);
                std::fs::read_to_string(&path).with_context(|| {
                    format!(
                        "Failed to read MCP configuration for '{}': {}",
                        self.name,
                        path.display()
                    )
                })
            }
            _ => anyhow::bail!(
                "Server '{}' must set exactly one of 'json' or 'file'",
                self.name
            ),
        }
    }
}

impl McpnormConfig {
    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.servers {
            if entry.name.trim().is_empty() {
                anyhow::bail!("Server name cannot be empty");
            }
            if !seen.insert(entry.name.trim().to_lowercase()) {
                anyhow::bail!("Duplicate server name: '{}'", entry.name);
            }
            if entry.json.is_some() == entry.file.is_some() {
                anyhow::bail!(
                    "Server '{}' must set exactly one of 'json' or 'file'",
                    entry.name
                );
            }
        }
        Ok(())
    }

    /// Turn every entry into a record, in file order.
    ///
    /// Disabled entries become inactive records without touching their files.
    pub fn load_records(&self, base_dir: &Path) -> anyhow::Result<Vec<McpServerRecord>> {
        self.servers
            .iter()
            .map(|entry| {
                let json_structure = if entry.enabled {
                    entry.load_json(base_dir)?
                } else {
                    String::new()
                };
                Ok(McpServerRecord {
                    name: entry.name.clone(),
                    json_structure,
                    active: entry.enabled,
                })
            })
            .collect()
    }
}
