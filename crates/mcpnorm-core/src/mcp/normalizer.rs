//! Entry point: raw configuration document in, canonical server list out.

use serde_json::{Map, Value};

use super::builder::{SkipReason, build, build_normalized, looks_normalized};
use super::candidate::{Candidate, extract_candidates};
use super::keys::WRAPPER_KEYS;
use super::spec::NormalizedServerConfig;
use super::transport::classify;

/// Separator between the record name and an embedded server key.
pub const NAME_SEPARATOR: &str = "::";

/// Normalize every server described by `raw` into the canonical schema.
///
/// `None`, `null` and non-object documents produce an empty list. Candidates
/// that cannot be normalized are skipped; they never fail the batch.
pub fn normalize_to_array(
    raw: Option<&Value>,
    default_name: Option<&str>,
) -> Vec<NormalizedServerConfig> {
    match raw {
        Some(Value::Object(doc)) => normalize_document(doc, default_name),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            tracing::debug!(
                kind = value_kind(other),
                "MCP configuration root is not an object; nothing to normalize"
            );
            Vec::new()
        }
    }
}

/// Normalize a document that is already known to be an object.
pub fn normalize_document(
    doc: &Map<String, Value>,
    default_name: Option<&str>,
) -> Vec<NormalizedServerConfig> {
    let mut out = Vec::new();
    for candidate in extract_candidates(doc) {
        match normalize_candidate(&candidate) {
            Ok(mut config) => {
                if let Some(name) = resolve_name(default_name, candidate.name_override) {
                    config.name = Some(name);
                }
                out.push(config);
            }
            Err(reason) => {
                let name = resolve_name(default_name, candidate.name_override);
                tracing::debug!(
                    server = name.as_deref().unwrap_or("<unnamed>"),
                    %reason,
                    "skipping MCP server configuration"
                );
            }
        }
    }
    out
}

/// Classify and build one candidate.
pub fn normalize_candidate(
    candidate: &Candidate<'_>,
) -> Result<NormalizedServerConfig, SkipReason> {
    let body = peel(candidate.body);

    if let Some(transport) = looks_normalized(body) {
        return build_normalized(body, transport);
    }

    let transport = classify(body).ok_or(SkipReason::UnknownTransport)?;
    build(body, transport)
}

/// Final display name for an entry.
///
/// Both present and different (ignoring case): `default::embedded`.
/// Otherwise whichever one exists, preferring the default.
pub fn resolve_name(default_name: Option<&str>, name_override: Option<&str>) -> Option<String> {
    let default_name = default_name.map(str::trim).filter(|s| !s.is_empty());
    let embedded = name_override.map(str::trim).filter(|s| !s.is_empty());
    match (default_name, embedded) {
        (Some(base), Some(sub)) if base.to_lowercase() != sub.to_lowercase() => {
            Some(format!("{base}{NAME_SEPARATOR}{sub}"))
        }
        (Some(base), _) => Some(base.to_string()),
        (None, sub) => sub.map(str::to_string),
    }
}

/// Unwrap `{"mcp": {...}}` and `{"server": {...}}` envelopes.
pub fn peel(body: &Map<String, Value>) -> &Map<String, Value> {
    WRAPPER_KEYS.iter().fold(body, |current, key| match current.get(*key) {
        Some(Value::Object(inner)) => inner,
        _ => current,
    })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
