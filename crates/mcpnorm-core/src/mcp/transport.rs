//! Transport kinds and heuristic transport classification.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use super::coerce::{coerce_scalar_string, first_non_empty_string, has_any};
use super::keys::{COMMAND_KEYS, HOST_KEYS, PORT_KEYS, TRANSPORT_KEYS, URL_KEYS};

/// How a client reaches an MCP server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Local subprocess speaking over stdin/stdout
    Stdio,
    /// Server-sent events
    Sse,
    #[serde(rename = "websocket")]
    WebSocket,
    StreamableHttp,
}

impl Transport {
    /// Parse a declared transport tag, accepting the common synonyms.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "stdio" => Some(Transport::Stdio),
            "sse" => Some(Transport::Sse),
            "ws" | "websocket" => Some(Transport::WebSocket),
            "http" | "https" | "streamable_http" | "streamable-http" | "streamablehttp"
            | "http_stream" => Some(Transport::StreamableHttp),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Stdio => "stdio",
            Transport::Sse => "sse",
            Transport::WebSocket => "websocket",
            Transport::StreamableHttp => "streamable_http",
        }
    }

    pub fn is_remote(self) -> bool {
        !matches!(self, Transport::Stdio)
    }

    /// Keys under which a body may nest the settings for this transport.
    pub fn nested_keys(self) -> &'static [&'static str] {
        match self {
            Transport::Stdio => &["stdio"],
            Transport::Sse => &["sse"],
            Transport::WebSocket => &["websocket"],
            Transport::StreamableHttp => &["streamable_http", "http"],
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Nested-object probes, in the order they are tried.
const NESTED_PROBES: &[Transport] = &[
    Transport::WebSocket,
    Transport::Sse,
    Transport::StreamableHttp,
    Transport::Stdio,
];

/// Decide which transport a candidate body describes.
///
/// Explicit declarations win over inferred ones, and a command outranks a URL
/// when both are present. Returns `None` when nothing points to a transport.
pub fn classify(body: &Map<String, Value>) -> Option<Transport> {
    if let Some(declared) = declared_transport(body) {
        tracing::trace!(transport = %declared, "transport declared explicitly");
        return Some(declared);
    }

    if has_command_evidence(body) {
        return Some(Transport::Stdio);
    }

    if let Some(url) = first_non_empty_string(body, URL_KEYS) {
        let transport = classify_url(&url);
        tracing::trace!(%url, transport = %transport, "transport inferred from url");
        return Some(transport);
    }

    for transport in NESTED_PROBES {
        if transport
            .nested_keys()
            .iter()
            .any(|key| matches!(body.get(*key), Some(Value::Object(_))))
        {
            return Some(*transport);
        }
    }

    if coerce_scalar_string(body, HOST_KEYS).is_some()
        && coerce_scalar_string(body, PORT_KEYS).is_some()
    {
        return Some(Transport::StreamableHttp);
    }

    None
}

/// A bare `path` next to a `host` is a URL path, not an executable.
fn has_command_evidence(body: &Map<String, Value>) -> bool {
    COMMAND_KEYS.iter().any(|key| match *key {
        "path" => body.contains_key("path") && !has_any(body, HOST_KEYS),
        other => body.contains_key(other),
    })
}

/// First transport alias whose value is a recognized tag.
pub fn declared_transport(body: &Map<String, Value>) -> Option<Transport> {
    TRANSPORT_KEYS.iter().find_map(|key| match body.get(*key) {
        Some(Value::String(tag)) => Transport::parse(tag),
        _ => None,
    })
}

/// Classify a remote endpoint by its URL.
pub fn classify_url(raw: &str) -> Transport {
    let trimmed = raw.trim();
    match Url::parse(trimmed) {
        Ok(url) if !url.cannot_be_a_base() => {
            if matches!(url.scheme(), "ws" | "wss") {
                return Transport::WebSocket;
            }
            let has_sse_segment = url
                .path_segments()
                .is_some_and(|mut segments| segments.any(|s| s.eq_ignore_ascii_case("sse")));
            if has_sse_segment {
                Transport::Sse
            } else {
                Transport::StreamableHttp
            }
        }
        _ => {
            let lower = trimmed.to_lowercase();
            if lower.starts_with("ws://") || lower.starts_with("wss://") {
                Transport::WebSocket
            } else if lower.contains("/sse") {
                Transport::Sse
            } else {
                Transport::StreamableHttp
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("fixture must be an object")
    }

    #[test]
    fn parse_accepts_synonyms_case_insensitively() {
        assert_eq!(Transport::parse(" WS "), Some(Transport::WebSocket));
        assert_eq!(Transport::parse("HTTPS"), Some(Transport::StreamableHttp));
        assert_eq!(Transport::parse("http_stream"), Some(Transport::StreamableHttp));
        assert_eq!(Transport::parse("Stdio"), Some(Transport::Stdio));
        assert_eq!(Transport::parse("sse"), Some(Transport::Sse));
        assert_eq!(Transport::parse("grpc"), None);
    }

    #[test]
    fn serializes_to_canonical_tags() {
        assert_eq!(json!(Transport::WebSocket), json!("websocket"));
        assert_eq!(json!(Transport::StreamableHttp), json!("streamable_http"));
        assert_eq!(Transport::Sse.to_string(), "sse");
    }

    #[test]
    fn explicit_tag_wins_over_shape() {
        let b = body(json!({"type": "sse", "command": "npx"}));
        assert_eq!(classify(&b), Some(Transport::Sse));
    }

    #[test]
    fn unrecognized_tag_falls_back_to_shape() {
        let b = body(json!({"type": "local", "command": "npx"}));
        assert_eq!(classify(&b), Some(Transport::Stdio));
    }

    #[test]
    fn later_alias_is_used_when_first_is_unrecognized() {
        let b = body(json!({"transport": "carrier-pigeon", "protocol": "ws"}));
        assert_eq!(classify(&b), Some(Transport::WebSocket));
    }

    #[test]
    fn command_outranks_url() {
        let b = body(json!({"command": "uvx", "url": "https://example.com/mcp"}));
        assert_eq!(classify(&b), Some(Transport::Stdio));
    }

    #[test]
    fn url_scheme_and_path_drive_remote_kind() {
        assert_eq!(classify_url("wss://example.com/mcp"), Transport::WebSocket);
        assert_eq!(classify_url("https://host/sse"), Transport::Sse);
        assert_eq!(classify_url("https://host/v1/SSE/stream"), Transport::Sse);
        assert_eq!(classify_url("https://host/api"), Transport::StreamableHttp);
        assert_eq!(classify_url("https://host/ssewhatever"), Transport::StreamableHttp);
    }

    #[test]
    fn unparseable_url_uses_text_heuristics() {
        assert_eq!(classify_url("localhost:9000/sse"), Transport::Sse);
        assert_eq!(classify_url("not a url"), Transport::StreamableHttp);
    }

    #[test]
    fn nested_transport_object_is_recognized() {
        let b = body(json!({"websocket": {"url": "ws://x"}}));
        assert_eq!(classify(&b), Some(Transport::WebSocket));
        let b = body(json!({"http": {"url": "https://x"}}));
        assert_eq!(classify(&b), Some(Transport::StreamableHttp));
        let b = body(json!({"stdio": {"command": "x"}}));
        assert_eq!(classify(&b), Some(Transport::Stdio));
    }

    #[test]
    fn host_and_port_together_imply_http() {
        let b = body(json!({"host": "localhost", "port": 8080}));
        assert_eq!(classify(&b), Some(Transport::StreamableHttp));
        let b = body(json!({"host": "localhost"}));
        assert_eq!(classify(&b), None);
    }

    #[test]
    fn path_beside_host_is_not_a_command() {
        let b = body(json!({"host": "localhost", "port": 8080, "path": "/mcp"}));
        assert_eq!(classify(&b), Some(Transport::StreamableHttp));
        let b = body(json!({"path": "/usr/local/bin/server"}));
        assert_eq!(classify(&b), Some(Transport::Stdio));
    }

    #[test]
    fn empty_body_is_unknown() {
        assert_eq!(classify(&Map::new()), None);
    }
}
