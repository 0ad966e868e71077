//! Accepted key aliases, highest priority first.

pub const TRANSPORT_KEYS: &[&str] = &["transport", "connection", "type", "protocol"];

pub const COMMAND_KEYS: &[&str] = &["command", "cmd", "bin", "executable", "path"];
pub const NESTED_COMMAND_PATH_KEYS: &[&str] = &["path"];
pub const NESTED_COMMAND_ARGS_KEYS: &[&str] = &["args", "argv"];
pub const ARGS_KEYS: &[&str] = &["args", "argv", "arguments", "cmdArgs"];
pub const ENV_KEYS: &[&str] = &["env", "environment", "envVars"];
pub const CWD_KEYS: &[&str] = &["cwd", "workingDir", "workdir"];

pub const URL_KEYS: &[&str] = &["url", "uri", "endpoint", "baseUrl", "serverUrl", "httpUrl"];
pub const HOST_KEYS: &[&str] = &["host"];
pub const PORT_KEYS: &[&str] = &["port"];
pub const PATH_KEYS: &[&str] = &["path"];
pub const HEADERS_KEYS: &[&str] = &["headers", "httpHeaders"];
pub const TIMEOUT_KEYS: &[&str] = &["timeout", "timeoutMs", "requestTimeoutMs"];

/// Wrappers peeled off a candidate body before it is classified.
pub const WRAPPER_KEYS: &[&str] = &["mcp", "server"];

/// Keys that make up the canonical output; never copied into passthrough extras.
pub const CANONICAL_KEYS: &[&str] = &[
    "name",
    "transport",
    "command",
    "args",
    "env",
    "cwd",
    "url",
    "headers",
    "timeoutMs",
];
