//! Canonical normalized server configuration.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};

use super::transport::Transport;

/// How to reach the server. A config is either launched or dialed, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Stdio {
        command: String,
        args: Option<Vec<String>>,
        env: Option<BTreeMap<String, String>>,
        cwd: Option<String>,
    },
    Remote {
        url: String,
        headers: Option<BTreeMap<String, String>>,
        timeout_ms: Option<u64>,
    },
}

/// One server in the canonical schema consumed by connectors.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedServerConfig {
    pub name: Option<String>,
    pub transport: Transport,
    pub endpoint: Endpoint,
    /// Unrecognized keys kept from bodies that were already normalized.
    pub extra: Map<String, Value>,
}

impl NormalizedServerConfig {
    pub fn stdio(
        command: String,
        args: Option<Vec<String>>,
        env: Option<BTreeMap<String, String>>,
        cwd: Option<String>,
    ) -> Self {
        Self {
            name: None,
            transport: Transport::Stdio,
            endpoint: Endpoint::Stdio {
                command,
                args,
                env,
                cwd,
            },
            extra: Map::new(),
        }
    }

    /// Build a remote config. Only the remote arm of the builder dispatch
    /// calls this, so `transport` is never [`Transport::Stdio`].
    pub(crate) fn remote(
        transport: Transport,
        url: String,
        headers: Option<BTreeMap<String, String>>,
        timeout_ms: Option<u64>,
    ) -> Self {
        debug_assert!(transport.is_remote());
        Self {
            name: None,
            transport,
            endpoint: Endpoint::Remote {
                url,
                headers,
                timeout_ms,
            },
            extra: Map::new(),
        }
    }

    pub fn command(&self) -> Option<&str> {
        match &self.endpoint {
            Endpoint::Stdio { command, .. } => Some(command),
            Endpoint::Remote { .. } => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match &self.endpoint {
            Endpoint::Remote { url, .. } => Some(url),
            Endpoint::Stdio { .. } => None,
        }
    }

    /// Render the flat JSON object connectors expect.
    pub fn to_json(&self) -> Value {
        let mut obj = self.extra.clone();
        obj.insert("transport".to_string(), json!(self.transport.as_str()));
        match &self.endpoint {
            Endpoint::Stdio {
                command,
                args,
                env,
                cwd,
            } => {
                obj.insert("command".to_string(), json!(command));
                if let Some(args) = args {
                    obj.insert("args".to_string(), json!(args));
                }
                if let Some(env) = env {
                    obj.insert("env".to_string(), json!(env));
                }
                if let Some(cwd) = cwd {
                    obj.insert("cwd".to_string(), json!(cwd));
                }
            }
            Endpoint::Remote {
                url,
                headers,
                timeout_ms,
            } => {
                obj.insert("url".to_string(), json!(url));
                if let Some(headers) = headers {
                    obj.insert("headers".to_string(), json!(headers));
                }
                if let Some(timeout_ms) = timeout_ms {
                    obj.insert("timeoutMs".to_string(), json!(timeout_ms));
                }
            }
        }
        if let Some(name) = &self.name {
            obj.insert("name".to_string(), json!(name));
        }
        Value::Object(obj)
    }
}

impl Serialize for NormalizedServerConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Render a batch as the JSON array handed to the agent runtime.
pub fn to_json_array(configs: &[NormalizedServerConfig]) -> Value {
    Value::Array(configs.iter().map(NormalizedServerConfig::to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdio_omits_unresolved_optionals() {
        let config = NormalizedServerConfig::stdio("npx".to_string(), None, None, None);
        assert_eq!(
            config.to_json(),
            json!({"transport": "stdio", "command": "npx"})
        );
    }

    #[test]
    fn remote_renders_timeout_in_camel_case() {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "Bearer t".to_string());
        let mut config = NormalizedServerConfig::remote(
            Transport::Sse,
            "https://host/sse".to_string(),
            Some(headers),
            Some(5000),
        );
        config.name = Some("remote".to_string());

        assert_eq!(
            config.to_json(),
            json!({
                "transport": "sse",
                "url": "https://host/sse",
                "headers": {"Authorization": "Bearer t"},
                "timeoutMs": 5000,
                "name": "remote"
            })
        );
        assert_eq!(config.command(), None);
        assert_eq!(config.url(), Some("https://host/sse"));
    }

    #[test]
    fn canonical_fields_win_over_extras() {
        let mut config = NormalizedServerConfig::stdio("uvx".to_string(), None, None, None);
        config.extra.insert("command".to_string(), json!("stale"));
        config.extra.insert("disabled".to_string(), json!(false));

        let value = config.to_json();
        assert_eq!(value["command"], json!("uvx"));
        assert_eq!(value["disabled"], json!(false));
    }

    #[test]
    fn serialize_matches_to_json() {
        let config = NormalizedServerConfig::remote(
            Transport::WebSocket,
            "ws://localhost:1".to_string(),
            None,
            None,
        );
        assert_eq!(serde_json::to_value(&config).unwrap(), config.to_json());
    }
}
