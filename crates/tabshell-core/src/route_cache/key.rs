//! Route keys

use crate::catalog::normalize_path;
use std::fmt;

/// Canonical cache key: the path without query, fragment or surrounding
/// separators, e.g. `basic-system/log`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey(String);

impl RouteKey {
    /// Derive the key of a navigated path
    pub fn from_path(path: &str) -> Self {
        Self(normalize_path(strip_query(path)).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteKey {
    fn from(path: &str) -> Self {
        Self::from_path(path)
    }
}

/// Cut the query and fragment off a path
pub fn strip_query(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(pos) => &path[..pos],
        None => path,
    }
}
