//! Discovery of server descriptions inside a raw configuration document.
//!
//! Different tools wrap their servers differently:
//! - `mcpServers: { name: {...} }` (Claude Desktop, Cursor, Claude Code)
//! - `mcp: { servers: [...] | { name: {...} } }`
//! - `servers: [...] | { name: {...} }` (VS Code)
//! - `context_servers: { name: {...} }` (Zed)
//!
//! Each convention is an independent [`ExtractionStrategy`]; all of them run
//! and their results accumulate in order.

use serde_json::{Map, Value};

/// One not-yet-normalized server description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    /// Key the body was found under, for named-map conventions.
    pub name_override: Option<&'a str>,
    pub body: &'a Map<String, Value>,
}

impl<'a> Candidate<'a> {
    pub fn named(name: &'a str, body: &'a Map<String, Value>) -> Self {
        Self {
            name_override: Some(name),
            body,
        }
    }

    pub fn unnamed(body: &'a Map<String, Value>) -> Self {
        Self {
            name_override: None,
            body,
        }
    }
}

/// A single container convention.
pub trait ExtractionStrategy: Send + Sync {
    /// Append every candidate this convention finds in `doc`.
    fn extract<'a>(&self, doc: &'a Map<String, Value>, out: &mut Vec<Candidate<'a>>);
}

/// A top-level map of server name to body.
#[derive(Debug, Clone, Copy)]
pub struct NamedMap(pub &'static str);

impl ExtractionStrategy for NamedMap {
    fn extract<'a>(&self, doc: &'a Map<String, Value>, out: &mut Vec<Candidate<'a>>) {
        if let Some(Value::Object(map)) = doc.get(self.0) {
            push_named(map, out);
        }
    }
}

/// A top-level field holding either an array of bodies or a named map.
#[derive(Debug, Clone, Copy)]
pub struct ListOrMap(pub &'static str);

impl ExtractionStrategy for ListOrMap {
    fn extract<'a>(&self, doc: &'a Map<String, Value>, out: &mut Vec<Candidate<'a>>) {
        push_list_or_map(doc.get(self.0), out);
    }
}

/// A wrapper object whose inner field is an array of bodies or a named map.
#[derive(Debug, Clone, Copy)]
pub struct NestedWrapper {
    pub wrapper: &'static str,
    pub field: &'static str,
}

impl ExtractionStrategy for NestedWrapper {
    fn extract<'a>(&self, doc: &'a Map<String, Value>, out: &mut Vec<Candidate<'a>>) {
        if let Some(Value::Object(inner)) = doc.get(self.wrapper) {
            push_list_or_map(inner.get(self.field), out);
        }
    }
}

fn push_named<'a>(map: &'a Map<String, Value>, out: &mut Vec<Candidate<'a>>) {
    for (name, value) in map {
        if let Value::Object(body) = value {
            out.push(Candidate::named(name, body));
        }
    }
}

fn push_list_or_map<'a>(value: Option<&'a Value>, out: &mut Vec<Candidate<'a>>) {
    match value {
        Some(Value::Array(items)) => {
            out.extend(items.iter().filter_map(Value::as_object).map(Candidate::unnamed));
        }
        Some(Value::Object(map)) => push_named(map, out),
        _ => {}
    }
}

/// Conventions recognized by [`extract_candidates`], in discovery order.
pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
    vec![
        Box::new(NamedMap("mcpServers")),
        Box::new(NestedWrapper {
            wrapper: "mcp",
            field: "servers",
        }),
        Box::new(ListOrMap("servers")),
        Box::new(NamedMap("context_servers")),
    ]
}

/// Run `strategies` over `doc`; falls back to the whole document as one
/// unnamed candidate when nothing matches.
pub fn extract_with<'a>(
    doc: &'a Map<String, Value>,
    strategies: &[Box<dyn ExtractionStrategy>],
) -> Vec<Candidate<'a>> {
    let mut out = Vec::new();
    for strategy in strategies {
        strategy.extract(doc, &mut out);
    }
    if out.is_empty() {
        out.push(Candidate::unnamed(doc));
    }
    out
}

pub fn extract_candidates(doc: &Map<String, Value>) -> Vec<Candidate<'_>> {
    extract_with(doc, &default_strategies())
}
