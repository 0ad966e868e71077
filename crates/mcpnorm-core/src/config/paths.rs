//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_DIR_NAME: &str = "mcpnorm";
pub const CONFIG_FILE_NAME: &str = "mcpnorm.toml";

/// `<config_dir>/mcpnorm/mcpnorm.toml`, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| config_path_in(&dir))
}

pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Resolve a `file = "..."` reference against the directory of the config file.
pub fn resolve_relative(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
