//! XDG Base Directory paths for Director plugins.
//!
//! Plugin configuration lives under the XDG config directory on every
//! platform, so a plugin's settings move with the user's dotfiles.

use std::path::PathBuf;

/// Get the Director config directory.
///
/// Returns `$XDG_CONFIG_HOME/director` if set, otherwise `~/.config/director`.
///
/// # Examples
///
/// ```
/// use director_paths::config_dir;
///
/// let config = config_dir();
/// let plugin_dir = config.join("plugins");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("director")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/director")
    } else {
        PathBuf::from(".config/director")
    }
}

/// Get the Director data directory.
///
/// Returns `$XDG_DATA_HOME/director` if set, otherwise `~/.local/share/director`.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("director")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share/director")
    } else {
        PathBuf::from(".local/share/director")
    }
}

/// Directory holding everything a single plugin persists.
pub fn plugin_dir(plugin_name: &str) -> PathBuf {
    config_dir().join("plugins").join(plugin_name)
}

/// Default location of a plugin's property config file.
///
/// # Examples
///
/// ```
/// use director_paths::plugin_config_path;
///
/// let path = plugin_config_path("demo");
/// assert!(path.ends_with("plugins/demo/config.toml"));
/// ```
pub fn plugin_config_path(plugin_name: &str) -> PathBuf {
    plugin_dir(plugin_name).join("config.toml")
}
