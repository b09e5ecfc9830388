//! Error types for tabshell
//!
//! Only loading and validation can fail. The claim tree, the route instance
//! cache and the tab session manager degrade every runtime miss to a logged
//! no-op and never return these errors.

use thiserror::Error;

/// Result type alias for tabshell operations
pub type ShellResult<T> = Result<T, ShellError>;

/// Main error type for tabshell
#[derive(Error, Debug, Clone)]
pub enum ShellError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Route catalog errors (unreadable file, duplicate paths)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Permission dataset errors
    #[error("Permission data error: {0}")]
    Permission(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// Deserialization errors for any supported file format
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ShellError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a new catalog error
    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog(message.into())
    }

    /// Create a new permission data error
    pub fn permission(message: impl Into<String>) -> Self {
        Self::Permission(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<std::io::Error> for ShellError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ShellError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(format!("json: {}", error))
    }
}

impl From<toml::de::Error> for ShellError {
    fn from(error: toml::de::Error) -> Self {
        Self::Parse(format!("toml: {}", error))
    }
}

impl From<serde_yaml::Error> for ShellError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Parse(format!("yaml: {}", error))
    }
}
