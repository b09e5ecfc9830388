//! Static route catalog
//!
//! Fixed table of which page lives at which path, which claim guards it, and
//! whether its live instance survives navigating away. Consumed read-only by
//! the tab session manager and the navigation host.

use crate::config::{ShellConfig, load_structured};
use crate::error::{ShellError, ShellResult};
use crate::tabs::tab_id;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One catalog row, as resolved against the shell configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteDefinition {
    /// Catalog-relative path, e.g. `basic-system/log`
    pub path: String,

    /// Code of the claim required to open the page
    pub claim: String,

    /// Whether the page instance is kept alive when navigated away from
    pub cacheable: bool,
}

impl RouteDefinition {
    pub fn new(path: impl Into<String>, claim: impl Into<String>) -> Self {
        Self {
            path: normalize_path(&path.into()).to_string(),
            claim: claim.into(),
            cacheable: true,
        }
    }

    /// Mark the route as never cached
    pub fn not_cacheable(mut self) -> Self {
        self.cacheable = false;
        self
    }

    /// Absolute path used for navigation
    pub fn absolute_path(&self) -> String {
        format!("/{}", self.path)
    }
}

/// Catalog row as written in a catalog file
#[derive(Debug, Clone, Deserialize)]
struct RouteEntry {
    path: String,
    claim: String,
    #[serde(default, alias = "reuseRoute")]
    cacheable: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    routes: Vec<RouteEntry>,
}

/// Ordered, immutable route catalog
///
/// Every row maps to a distinct tab id under the catalog's joiner, so a tab
/// always identifies exactly one route.
#[derive(Debug, Clone)]
pub struct RouteCatalog {
    routes: Vec<RouteDefinition>,
    by_path: HashMap<String, usize>,
    tab_id_joiner: char,
}

impl RouteCatalog {
    /// Build a catalog, rejecting duplicate paths and colliding tab ids
    pub fn new(routes: Vec<RouteDefinition>, tab_id_joiner: char) -> ShellResult<Self> {
        let mut by_path = HashMap::with_capacity(routes.len());
        let mut by_tab_id: HashMap<String, &str> = HashMap::with_capacity(routes.len());

        for (pos, route) in routes.iter().enumerate() {
            if route.path.is_empty() {
                return Err(ShellError::catalog("Route path cannot be empty"));
            }
            if by_path.insert(route.path.clone(), pos).is_some() {
                return Err(ShellError::catalog(format!(
                    "Duplicate route path '{}'",
                    route.path
                )));
            }
            let id = tab_id(&route.path, tab_id_joiner);
            if let Some(other) = by_tab_id.insert(id.clone(), &route.path) {
                return Err(ShellError::catalog(format!(
                    "Routes '{}' and '{}' share the tab id '{}'",
                    other, route.path, id
                )));
            }
        }

        Ok(Self {
            routes,
            by_path,
            tab_id_joiner,
        })
    }

    /// Load a catalog file
    ///
    /// Rows without a cacheable flag take `config.default_cacheable`; tab ids
    /// are checked against `config.tab_id_joiner`.
    pub fn load(path: &Path, config: &ShellConfig) -> ShellResult<Self> {
        let file: CatalogFile = load_structured(path).map_err(|e| {
            ShellError::catalog(format!("Failed to load '{}': {}", path.display(), e))
        })?;

        let routes = file
            .routes
            .into_iter()
            .map(|entry| RouteDefinition {
                path: normalize_path(&entry.path).to_string(),
                claim: entry.claim,
                cacheable: entry.cacheable.unwrap_or(config.default_cacheable),
            })
            .collect();
        Self::new(routes, config.tab_id_joiner)
    }

    /// Find the route at a path; leading and trailing separators are ignored
    pub fn resolve(&self, path: &str) -> Option<&RouteDefinition> {
        self.by_path
            .get(normalize_path(path))
            .map(|&pos| &self.routes[pos])
    }

    /// First route guarded by a claim code
    pub fn route_for_claim(&self, code: &str) -> Option<&RouteDefinition> {
        self.routes.iter().find(|r| r.claim == code)
    }

    /// Claim code to catalog path; later rows win for repeated codes
    pub fn claim_route_map(&self) -> HashMap<String, String> {
        self.routes
            .iter()
            .map(|r| (r.claim.clone(), r.path.clone()))
            .collect()
    }

    /// Every distinct claim code referenced by the catalog
    pub fn claim_codes(&self) -> HashSet<&str> {
        self.routes.iter().map(|r| r.claim.as_str()).collect()
    }

    /// Joiner the tab ids were checked against
    pub fn tab_id_joiner(&self) -> char {
        self.tab_id_joiner
    }

    pub fn routes(&self) -> &[RouteDefinition] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Strip surrounding separators
pub fn normalize_path(path: &str) -> &str {
    path.trim_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn catalog() -> RouteCatalog {
        RouteCatalog::new(
            vec![
                RouteDefinition::new("basic-system/log", "BASIC_SYSTEM_LOG"),
                RouteDefinition::new("/basic-system/directory", "BASIC_SYSTEM_DIRECTORY"),
                RouteDefinition::new("payment-system/payment-method", "PAYMENT_SYSTEM_METHOD")
                    .not_cacheable(),
            ],
            '-',
        )
        .unwrap()
    }

    #[test]
    fn test_resolve_ignores_separators() {
        let catalog = catalog();
        assert_eq!(
            catalog.resolve("/basic-system/log").map(|r| r.claim.as_str()),
            Some("BASIC_SYSTEM_LOG")
        );
        assert!(catalog.resolve("basic-system/directory/").is_some());
        assert!(catalog.resolve("basic-system").is_none());
    }

    #[test]
    fn test_claim_route_map() {
        let map = catalog().claim_route_map();
        assert_eq!(map.len(), 3);
        assert_eq!(map["BASIC_SYSTEM_DIRECTORY"], "basic-system/directory");
    }

    #[test]
    fn test_duplicate_paths_rejected() {
        let result = RouteCatalog::new(
            vec![RouteDefinition::new("a", "A"), RouteDefinition::new("/a", "B")],
            '-',
        );
        assert!(matches!(result, Err(ShellError::Catalog(_))));
    }

    #[test]
    fn test_colliding_tab_ids_rejected() {
        let routes = vec![
            RouteDefinition::new("a/b-c", "X"),
            RouteDefinition::new("a-b/c", "Y"),
        ];

        let err = RouteCatalog::new(routes.clone(), '-').unwrap_err();
        assert!(matches!(err, ShellError::Catalog(_)));
        assert!(err.to_string().contains("a-b-c"));

        // a joiner that cannot appear in either path keeps them apart
        let catalog = RouteCatalog::new(routes, '_').unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tab_id_joiner(), '_');
    }

    #[test]
    fn test_load_checks_tab_ids_with_configured_joiner() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("routes.json");
        fs::write(
            &path,
            r#"{ "routes": [ { "path": "a/b-c", "claim": "X" }, { "path": "a-b/c", "claim": "Y" } ] }"#,
        )
        .unwrap();

        assert!(RouteCatalog::load(&path, &ShellConfig::default()).is_err());

        let config = ShellConfig {
            tab_id_joiner: '.',
            ..ShellConfig::default()
        };
        assert_eq!(RouteCatalog::load(&path, &config).unwrap().len(), 2);
    }

    #[test]
    fn test_load_toml_with_default_cacheable() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("routes.toml");
        fs::write(
            &path,
            r#"
[[routes]]
path = "basic-system/log"
claim = "BASIC_SYSTEM_LOG"

[[routes]]
path = "external-system/vendor-data"
claim = "EXTERNAL_SYSTEM_VENDOR_DATA"
cacheable = true
"#,
        )
        .unwrap();

        let config = ShellConfig {
            default_cacheable: false,
            ..ShellConfig::default()
        };
        let catalog = RouteCatalog::load(&path, &config).unwrap();
        assert_eq!(catalog.len(), 2);
        assert!(!catalog.routes()[0].cacheable);
        assert!(catalog.routes()[1].cacheable);
    }

    #[test]
    fn test_load_json_accepts_reuse_route_alias() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("routes.json");
        fs::write(
            &path,
            r#"{ "routes": [ { "path": "/a/b", "claim": "A", "reuseRoute": false } ] }"#,
        )
        .unwrap();

        let catalog = RouteCatalog::load(&path, &ShellConfig::default()).unwrap();
        let route = catalog.resolve("a/b").unwrap();
        assert!(!route.cacheable);
        assert_eq!(route.absolute_path(), "/a/b");
    }
}
