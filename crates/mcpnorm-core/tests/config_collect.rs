//! Integration tests for loading mcpnorm.toml and aggregating its records.

use mcpnorm_core::config::{collect_from_file, config_path_in, parse_config_file};
use mcpnorm_core::mcp::to_json_array;
use serde_json::json;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create dirs");
    }
    std::fs::write(&path, content).expect("write file");
    path
}

#[test]
fn collect_concatenates_enabled_records_in_order() {
    let temp = TempDir::new().expect("create temp dir");
    write(
        &temp,
        "servers/fs.json",
        r#"{"mcpServers": {"fs": {"command": "npx", "args": "-y server-fs"}}}"#,
    );
    write(&temp, "servers/off.json", r#"{"command": "never-read"}"#);
    let config_path = write(
        &temp,
        "mcpnorm.toml",
        r#"
[vars]
ERP_HOST = "https://erp.example.com"

[[server]]
name = "filesystem"
file = "servers/fs.json"

[[server]]
name = "disabled"
enabled = false
file = "servers/off.json"

[[server]]
name = "erp"
json = '{"url": "@ERP_HOST@/sws/copilot/sse", "headers": {"X-Token": "t"}}'
"#,
    );

    let configs = collect_from_file(&config_path).expect("collect should succeed");

    assert_eq!(
        to_json_array(&configs),
        json!([
            {
                "transport": "stdio",
                "command": "npx",
                "args": ["-y", "server-fs"],
                "name": "filesystem::fs"
            },
            {
                "transport": "sse",
                "url": "https://erp.example.com/sws/copilot/sse",
                "headers": {"X-Token": "t"},
                "name": "erp"
            }
        ])
    );
}

#[test]
fn collect_skips_record_with_malformed_json() {
    let temp = TempDir::new().expect("create temp dir");
    let config_path = write(
        &temp,
        "mcpnorm.toml",
        r#"
[[server]]
name = "broken"
json = '{"command": '

[[server]]
name = "fine"
json = '{"command": "uvx", "args": ["mcp-server-time"]}'
"#,
    );

    let configs = collect_from_file(&config_path).expect("collect should succeed");

    assert_eq!(configs.len(), 1);
    assert_eq!(configs[0].name.as_deref(), Some("fine"));
}

#[test]
fn collect_fails_when_referenced_file_is_missing() {
    let temp = TempDir::new().expect("create temp dir");
    let config_path = write(
        &temp,
        "mcpnorm.toml",
        r#"
[[server]]
name = "ghost"
file = "ghost.json"
"#,
    );

    let err = collect_from_file(&config_path).unwrap_err();

    assert!(format!("{err:#}").contains("ghost"));
}

#[test]
fn parse_config_file_reports_path_on_error() {
    let temp = TempDir::new().expect("create temp dir");
    let config_path = write(&temp, "mcpnorm.toml", "[[server]\nname = 1\n");

    let err = parse_config_file(&config_path).unwrap_err();

    assert!(format!("{err:#}").contains("mcpnorm.toml"));
}

#[test]
fn config_path_lives_under_app_directory() {
    let temp = TempDir::new().expect("create temp dir");
    let path = config_path_in(temp.path());
    assert!(path.ends_with("mcpnorm/mcpnorm.toml"));
}
