//! Loading the data files and wiring a shell around them

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tabshell_core::{PermissionDataset, RouteCatalog, RouteDefinition, Shell, ShellConfig};
use tracing::{debug, info};

/// Stand-in page instance; the serial tells restored pages from fresh ones
#[derive(Debug)]
pub struct Page {
    pub route: String,
    pub serial: usize,
}

impl Drop for Page {
    fn drop(&mut self) {
        debug!("Page #{} ({}) destroyed", self.serial, self.route);
    }
}

/// Dataset, catalog and the shell built from them
pub struct Workspace {
    pub dataset: PermissionDataset,
    pub shell: Shell<Page>,
}

impl Workspace {
    pub fn load(config: ShellConfig, permissions: &Path, catalog: &Path) -> Result<Self> {
        let dataset = PermissionDataset::load(permissions)
            .with_context(|| format!("Failed to load permissions {}", permissions.display()))?;
        let catalog = RouteCatalog::load(catalog, &config)
            .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;

        info!(
            "Loaded {} claims, {} users, {} routes",
            dataset.claims.len(),
            dataset.users.len(),
            catalog.len()
        );
        Ok(Self::new(config, dataset, catalog))
    }

    pub fn new(config: ShellConfig, dataset: PermissionDataset, catalog: RouteCatalog) -> Self {
        let serial = AtomicUsize::new(1);
        let shell = Shell::new(
            config,
            catalog,
            dataset.claims.clone(),
            Box::new(move |route: &RouteDefinition| Page {
                route: route.path.clone(),
                serial: serial.fetch_add(1, Ordering::SeqCst),
            }),
        );
        Self { dataset, shell }
    }

    /// Log a dataset user in and land on the home view
    pub fn login(&self, username: &str) -> Result<()> {
        self.shell
            .login_from_dataset(&self.dataset, username)
            .with_context(|| format!("Login as '{}' failed", username))?;
        Ok(())
    }
}
