//! Aggregation of stored MCP server records into one connector list.
//!
//! A record holds the raw JSON text an administrator pasted in plus the
//! record's display name. Records are independent: one with broken JSON is
//! logged and left out, the rest still contribute.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::mcp::{NormalizedServerConfig, normalize_document};

/// A stored MCP server definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpServerRecord {
    /// Display name, used as the default server name
    pub name: String,
    /// Raw JSON configuration text
    pub json_structure: String,
    /// Inactive records are ignored
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl McpServerRecord {
    pub fn new(name: impl Into<String>, json_structure: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            json_structure: json_structure.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Why a record contributed nothing.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid JSON structure in MCP configuration '{name}': {source}")]
    InvalidJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MCP configuration '{name}' must be a JSON object")]
    NotAnObject { name: String },
}

/// `@KEY@` text substitutions applied to raw JSON before parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Placeholders(BTreeMap<String, String>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replace every `@KEY@` occurrence; unknown placeholders are left as is.
    pub fn apply(&self, text: &str) -> String {
        self.0.iter().fold(text.to_string(), |acc, (key, value)| {
            acc.replace(&format!("@{key}@"), value)
        })
    }
}

impl FromIterator<(String, String)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Normalize a single record.
///
/// Entries that end up without a name are named after the record.
pub fn normalize_record(
    record: &McpServerRecord,
    placeholders: &Placeholders,
) -> Result<Vec<NormalizedServerConfig>, RecordError> {
    let text = placeholders.apply(&record.json_structure);
    let value: Value = serde_json::from_str(&text).map_err(|source| RecordError::InvalidJson {
        name: record.name.clone(),
        source,
    })?;
    let doc = match value {
        Value::Object(doc) => doc,
        _ => {
            return Err(RecordError::NotAnObject {
                name: record.name.clone(),
            });
        }
    };

    let mut configs = normalize_document(&doc, Some(&record.name));
    for config in &mut configs {
        let unnamed = config.name.as_deref().is_none_or(|n| n.trim().is_empty());
        if unnamed {
            config.name = Some(record.name.clone());
        }
    }
    Ok(configs)
}

/// Concatenate the normalized servers of every active record, in record order.
pub fn collect_configurations(
    records: &[McpServerRecord],
    placeholders: &Placeholders,
) -> Vec<NormalizedServerConfig> {
    let mut out = Vec::new();
    for record in records {
        if !record.active || record.json_structure.trim().is_empty() {
            tracing::debug!(record = %record.name, "skipping inactive or empty MCP record");
            continue;
        }
        match normalize_record(record, placeholders) {
            Ok(configs) => out.extend(configs),
            Err(err) => tracing::warn!(record = %record.name, error = %err, "skipping MCP record"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn placeholders_replace_known_tokens_only() {
        let vars = Placeholders::new().with("HOST", "http://erp:8080");
        assert_eq!(
            vars.apply(r#"{"url": "@HOST@/mcp", "x": "@OTHER@"}"#),
            r#"{"url": "http://erp:8080/mcp", "x": "@OTHER@"}"#
        );
    }

    #[test]
    fn normalize_record_names_entries_after_record() {
        let record = McpServerRecord::new(
            "tools",
            r#"{"mcpServers": {"tools": {"command": "npx"}, "git": {"command": "uvx"}}}"#,
        );

        let configs = normalize_record(&record, &Placeholders::new()).unwrap();

        let names: Vec<_> = configs.iter().map(|c| c.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["tools", "tools::git"]);
    }

    #[test]
    fn normalize_record_rejects_invalid_json() {
        let record = McpServerRecord::new("broken", "{not json");
        let err = normalize_record(&record, &Placeholders::new()).unwrap_err();
        assert!(matches!(err, RecordError::InvalidJson { ref name, .. } if name == "broken"));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn normalize_record_rejects_non_object_root() {
        let record = McpServerRecord::new("list", r#"[{"command": "npx"}]"#);
        let err = normalize_record(&record, &Placeholders::new()).unwrap_err();
        assert!(matches!(err, RecordError::NotAnObject { .. }));
    }

    #[test]
    fn collect_skips_inactive_empty_and_broken_records() {
        let records = vec![
            McpServerRecord::new("a", r#"{"command": "a-bin"}"#),
            McpServerRecord::new("b", r#"{"command": "b-bin"}"#).inactive(),
            McpServerRecord::new("c", "   "),
            McpServerRecord::new("d", "{oops"),
            McpServerRecord::new("e", r#"{"url": "@HOST@/sse"}"#),
        ];
        let vars = Placeholders::new().with("HOST", "https://erp.example.com");

        let configs = collect_configurations(&records, &vars);

        let values: Vec<Value> = configs.iter().map(NormalizedServerConfig::to_json).collect();
        assert_eq!(
            values,
            vec![
                json!({"transport": "stdio", "command": "a-bin", "name": "a"}),
                json!({"transport": "sse", "url": "https://erp.example.com/sse", "name": "e"}),
            ]
        );
    }
}
