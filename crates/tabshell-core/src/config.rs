//! Shell configuration and file loading
//!
//! Supports JSON, TOML, and YAML formats based on file extension.

use crate::catalog::normalize_path;
use crate::error::{ShellError, ShellResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Paths that are never turned into tabs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Home view shown when no tab is open
    pub home_path: String,

    /// Login page
    pub login_path: String,

    /// Page shown when a guard denies access
    pub unauthorized_path: String,

    /// Character that replaces path separators in tab ids
    pub tab_id_joiner: char,

    /// Cacheable flag for catalog entries that omit it
    pub default_cacheable: bool,

    /// Buffer size of the event bus
    pub event_capacity: usize,

    /// Logging settings, consumed by the binary
    pub logging: LoggingConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            home_path: "/".to_string(),
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            tab_id_joiner: '-',
            default_cacheable: true,
            event_capacity: 256,
            logging: LoggingConfig::default(),
        }
    }
}

impl ShellConfig {
    /// Check that the special paths are absolute and the joiner is usable
    pub fn validate(&self) -> ShellResult<()> {
        for (name, path) in [
            ("home_path", &self.home_path),
            ("login_path", &self.login_path),
            ("unauthorized_path", &self.unauthorized_path),
        ] {
            if !path.starts_with('/') {
                return Err(ShellError::config(format!(
                    "{} must be an absolute path, got '{}'",
                    name, path
                )));
            }
        }

        if self.tab_id_joiner == '/' || self.tab_id_joiner.is_whitespace() {
            return Err(ShellError::config(format!(
                "tab_id_joiner '{}' cannot be a separator or whitespace",
                self.tab_id_joiner
            )));
        }

        if self.event_capacity == 0 {
            return Err(ShellError::config("event_capacity must be at least 1"));
        }

        Ok(())
    }

    /// Whether a query-free path is one of the paths that never become tabs
    ///
    /// Surrounding separators are ignored, so `/login/` is reserved too.
    pub fn is_reserved_path(&self, clean_path: &str) -> bool {
        let path = normalize_path(clean_path);
        path.is_empty() || path == normalize_path(&self.home_path) || self.is_public_path(path)
    }

    /// Whether a query-free path is the login or unauthorized page, which
    /// every visitor may open
    pub fn is_public_path(&self, clean_path: &str) -> bool {
        let path = normalize_path(clean_path);
        path == normalize_path(&self.login_path)
            || path == normalize_path(&self.unauthorized_path)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Load configuration from a file
///
/// Returns default config if the file doesn't exist.
pub fn load_from_file(path: &Path) -> ShellResult<ShellConfig> {
    if !path.exists() {
        return Ok(ShellConfig::default());
    }

    let config: ShellConfig = load_structured(path)
        .map_err(|e| ShellError::config(format!("{} ({})", e, path.display())))?;
    config.validate()?;
    Ok(config)
}

/// Read and deserialize a file, choosing the format from its extension
pub(crate) fn load_structured<T: DeserializeOwned>(path: &Path) -> ShellResult<T> {
    let content = fs::read_to_string(path)?;

    let value = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = load_from_file(&temp_dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shell.toml");
        fs::write(
            &config_path,
            r#"
home_path = "/home"
tab_id_joiner = "_"

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.home_path, "/home");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.tab_id_joiner, '_');
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shell.json");
        fs::write(&config_path, r#"{ "default_cacheable": false }"#).unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert!(!config.default_cacheable);
        assert_eq!(config.unauthorized_path, "/unauthorized");
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("shell.yaml");
        fs::write(&config_path, "event_capacity: 16\n").unwrap();

        let config = load_from_file(&config_path).unwrap();
        assert_eq!(config.event_capacity, 16);
    }

    #[test]
    fn test_validate_rejects_relative_paths() {
        let config = ShellConfig {
            login_path: "login".to_string(),
            ..ShellConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_separator_joiner() {
        let config = ShellConfig {
            tab_id_joiner: '/',
            ..ShellConfig::default()
        };
        assert!(matches!(config.validate(), Err(ShellError::Config(_))));
    }

    #[test]
    fn test_reserved_paths() {
        let config = ShellConfig::default();
        assert!(config.is_reserved_path("/"));
        assert!(config.is_reserved_path("/login"));
        assert!(config.is_reserved_path("/unauthorized"));
        assert!(config.is_reserved_path(""));
        assert!(!config.is_reserved_path("/basic-system/log"));
    }

    #[test]
    fn test_reserved_paths_ignore_trailing_separator() {
        let config = ShellConfig::default();
        assert!(config.is_reserved_path("/login/"));
        assert!(config.is_reserved_path("/unauthorized/"));
        assert!(config.is_reserved_path("//"));
        assert!(!config.is_reserved_path("/login/extra"));

        let config = ShellConfig {
            home_path: "/dashboard".to_string(),
            ..ShellConfig::default()
        };
        assert!(config.is_reserved_path("/dashboard/"));
        assert!(config.is_public_path("/login/"));
        assert!(!config.is_public_path("/dashboard"));
        assert!(!config.is_public_path("/"));
    }
}
