//! Tab data structure

use crate::catalog::{RouteDefinition, normalize_path};
use crate::route_cache::RouteKey;
use serde::{Deserialize, Serialize};

/// User-visible handle onto one open route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    /// Slug derived from the route path, unique among open tabs
    pub id: String,

    /// Display label, taken from the route's claim name
    pub title: String,

    /// Absolute route path
    pub route: String,

    /// Whether the tab bar shows a close button
    pub closable: bool,
}

impl Tab {
    /// Create a closable tab for a path
    pub fn new(title: impl Into<String>, route: &str, joiner: char) -> Self {
        let relative = normalize_path(route);
        Self {
            id: tab_id(relative, joiner),
            title: title.into(),
            route: format!("/{}", relative),
            closable: true,
        }
    }

    /// Create a closable tab for a catalog route
    pub fn for_route(route: &RouteDefinition, title: impl Into<String>, joiner: char) -> Self {
        Self::new(title, &route.path, joiner)
    }

    /// Keep the tab open permanently
    pub fn pinned(mut self) -> Self {
        self.closable = false;
        self
    }

    /// Cache key of the tab's route
    pub fn route_key(&self) -> RouteKey {
        RouteKey::from_path(&self.route)
    }
}

/// Tab id for a catalog-relative path: separators replaced by `joiner`
pub fn tab_id(relative_path: &str, joiner: char) -> String {
    normalize_path(relative_path).replace('/', &joiner.to_string())
}
