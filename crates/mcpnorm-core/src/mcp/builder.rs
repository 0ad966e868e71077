//! Per-transport builders for canonical server configs.
//!
//! Each builder reads a classified candidate body through the alias tables in
//! [`super::keys`] and either produces a [`NormalizedServerConfig`] or says why
//! the candidate has to be skipped.

use serde_json::{Map, Value};

use super::coerce::{
    coerce_int, coerce_scalar_string, coerce_string_array, coerce_string_map,
    first_non_empty_string,
};
use super::keys::{
    ARGS_KEYS, CANONICAL_KEYS, COMMAND_KEYS, CWD_KEYS, ENV_KEYS, HEADERS_KEYS, HOST_KEYS,
    NESTED_COMMAND_ARGS_KEYS, NESTED_COMMAND_PATH_KEYS, PATH_KEYS, PORT_KEYS, TIMEOUT_KEYS,
    TRANSPORT_KEYS, URL_KEYS,
};
use super::spec::NormalizedServerConfig;
use super::transport::Transport;

/// Why a candidate contributed nothing to the output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("no recognizable transport")]
    UnknownTransport,
    #[error("stdio server has no command")]
    MissingCommand,
    #[error("{0} server has no url and no host/port to build one")]
    MissingUrl(Transport),
}

/// Dispatch to the builder for `transport`.
///
/// Settings nested under the transport's own key (`{"sse": {"url": ...}}`)
/// are promoted first; top-level values win on conflict.
pub fn build(
    body: &Map<String, Value>,
    transport: Transport,
) -> Result<NormalizedServerConfig, SkipReason> {
    build_flat(&promote_nested(body, transport), transport)
}

fn build_flat(
    body: &Map<String, Value>,
    transport: Transport,
) -> Result<NormalizedServerConfig, SkipReason> {
    match transport {
        Transport::Stdio => build_stdio(body),
        remote => build_remote(body, remote),
    }
}

/// Copy of `body` with the transport sub-object merged into the top level.
fn promote_nested(body: &Map<String, Value>, transport: Transport) -> Map<String, Value> {
    let mut flat = body.clone();
    for key in transport.nested_keys() {
        if let Some(Value::Object(nested)) = body.get(*key) {
            for (k, v) in nested {
                flat.entry(k.clone()).or_insert_with(|| v.clone());
            }
            flat.remove(*key);
        }
    }
    flat
}

/// Build a local-process server.
///
/// `command` may itself be an object (`{"path": ..., "args": [...]}`), in which
/// case its nested args are preferred over the top-level ones.
fn build_stdio(body: &Map<String, Value>) -> Result<NormalizedServerConfig, SkipReason> {
    let mut command = None;
    let mut args = None;

    if let Some(Value::Object(nested)) = body.get("command") {
        command = first_non_empty_string(nested, NESTED_COMMAND_PATH_KEYS);
        args = coerce_string_array(nested, NESTED_COMMAND_ARGS_KEYS);
    }
    let command = command
        .or_else(|| first_non_empty_string(body, COMMAND_KEYS))
        .ok_or(SkipReason::MissingCommand)?;
    let args = args.or_else(|| coerce_string_array(body, ARGS_KEYS));
    let env = coerce_string_map(body, ENV_KEYS);
    let cwd = first_non_empty_string(body, CWD_KEYS);

    Ok(NormalizedServerConfig::stdio(command, args, env, cwd))
}

/// Build a network server for one of the three remote transports.
fn build_remote(
    body: &Map<String, Value>,
    transport: Transport,
) -> Result<NormalizedServerConfig, SkipReason> {
    let url = first_non_empty_string(body, URL_KEYS)
        .or_else(|| synthesize_url(body, transport))
        .ok_or(SkipReason::MissingUrl(transport))?;
    let headers = coerce_string_map(body, HEADERS_KEYS);
    let timeout_ms = coerce_int(body, TIMEOUT_KEYS)
        .filter(|ms| *ms > 0)
        .and_then(|ms| u64::try_from(ms).ok());

    Ok(NormalizedServerConfig::remote(
        transport, url, headers, timeout_ms,
    ))
}

/// `scheme://host:port/path` from loose fields; `ws` for websocket, else `http`.
fn synthesize_url(body: &Map<String, Value>, transport: Transport) -> Option<String> {
    let host = coerce_scalar_string(body, HOST_KEYS)?;
    let port = coerce_scalar_string(body, PORT_KEYS)?;
    let path = match first_non_empty_string(body, PATH_KEYS) {
        Some(path) if path.starts_with('/') => path,
        Some(path) => format!("/{path}"),
        None => String::new(),
    };
    let scheme = match transport {
        Transport::WebSocket => "ws",
        _ => "http",
    };
    Some(format!("{scheme}://{}:{}{path}", host.trim(), port.trim()))
}

/// Declared transport of a body that is already in (or close to) canonical
/// form: a recognized `transport` tag plus its required field, either at the
/// top level or inside the sub-object named after the transport.
pub fn looks_normalized(body: &Map<String, Value>) -> Option<Transport> {
    let transport = match body.get("transport") {
        Some(Value::String(tag)) => Transport::parse(tag)?,
        _ => return None,
    };
    let required = required_key(transport);
    let nested_has_required = transport.nested_keys().iter().any(|key| {
        matches!(body.get(*key), Some(Value::Object(nested)) if nested.contains_key(required))
    });
    (body.contains_key(required) || nested_has_required).then_some(transport)
}

/// Fast path for bodies accepted by [`looks_normalized`].
///
/// Promotes the transport sub-object to the top level, validates through the
/// regular builder and carries unknown keys through untouched.
pub fn build_normalized(
    body: &Map<String, Value>,
    transport: Transport,
) -> Result<NormalizedServerConfig, SkipReason> {
    let flat = promote_nested(body, transport);
    let mut config = build_flat(&flat, transport)?;
    config.name = first_non_empty_string(&flat, &["name"]);
    config.extra = flat
        .into_iter()
        .filter(|(k, _)| !is_consumed(k, transport))
        .collect();
    Ok(config)
}

/// Canonical keys plus every alias the builder for `transport` reads.
fn is_consumed(key: &str, transport: Transport) -> bool {
    let aliases: &[&[&str]] = match transport {
        Transport::Stdio => &[COMMAND_KEYS, ARGS_KEYS, ENV_KEYS, CWD_KEYS],
        _ => &[
            URL_KEYS,
            HOST_KEYS,
            PORT_KEYS,
            PATH_KEYS,
            HEADERS_KEYS,
            TIMEOUT_KEYS,
        ],
    };
    CANONICAL_KEYS.contains(&key)
        || TRANSPORT_KEYS.contains(&key)
        || aliases.iter().any(|table| table.contains(&key))
}

fn required_key(transport: Transport) -> &'static str {
    match transport {
        Transport::Stdio => "command",
        _ => "url",
    }
}
