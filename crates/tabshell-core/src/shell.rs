//! Composition root
//!
//! Wires the permission service, auth session, route instance cache,
//! navigation host and tab session manager together with explicit shared
//! references.

use crate::auth::AuthSession;
use crate::catalog::RouteCatalog;
use crate::config::ShellConfig;
use crate::error::ShellResult;
use crate::events::{SharedEventBus, shared_event_bus};
use crate::menu::{MenuItem, build_menu};
use crate::navigation::{NavigationHost, Navigator, PageFactory};
use crate::permission::{Claim, GrantSet, PermissionDataset, PermissionService, User};
use crate::route_cache::RouteInstanceCache;
use crate::tabs::TabSessionManager;
use std::sync::Arc;
use tracing::warn;

/// A fully wired tab workspace
pub struct Shell<H> {
    config: ShellConfig,
    events: SharedEventBus,
    catalog: Arc<RouteCatalog>,
    auth: Arc<AuthSession>,
    cache: Arc<RouteInstanceCache<H>>,
    host: Arc<NavigationHost<H>>,
    tabs: TabSessionManager,
}

impl<H: Send + Sync + 'static> Shell<H> {
    pub fn new(
        config: ShellConfig,
        catalog: RouteCatalog,
        claims: Vec<Claim>,
        factory: Box<dyn PageFactory<H>>,
    ) -> Self {
        let events = shared_event_bus(config.event_capacity);
        if catalog.tab_id_joiner() != config.tab_id_joiner {
            warn!(
                "Catalog tab ids were checked with '{}' but tabs are joined with '{}'",
                catalog.tab_id_joiner(),
                config.tab_id_joiner
            );
        }
        let catalog = Arc::new(catalog);
        let permissions = Arc::new(PermissionService::new(claims, events.clone()));
        let auth = Arc::new(AuthSession::new(permissions.clone()));
        let cache = Arc::new(RouteInstanceCache::new(events.clone()));
        let host = Arc::new(NavigationHost::new(
            config.clone(),
            catalog.clone(),
            auth.clone(),
            cache.clone(),
            factory,
        ));
        let tabs = TabSessionManager::new(
            config.clone(),
            catalog.clone(),
            permissions,
            cache.clone(),
            host.clone(),
            events.clone(),
        );

        Self {
            config,
            events,
            catalog,
            auth,
            cache,
            host,
            tabs,
        }
    }

    /// Log a user in and show the home view
    pub fn login(&self, user: User, grants: GrantSet) {
        self.auth.login(user, grants);
        self.host.navigate_to(&self.config.home_path);
        self.settle();
    }

    /// Log a dataset user in by name and show the home view
    pub fn login_from_dataset(
        &self,
        dataset: &PermissionDataset,
        username: &str,
    ) -> ShellResult<User> {
        let user = self.auth.login_from_dataset(dataset, username)?;
        self.host.navigate_to(&self.config.home_path);
        self.settle();
        Ok(user)
    }

    /// Close every tab, drop the grants and show the login page
    pub fn logout(&self) {
        self.tabs.close_all_tabs();
        self.settle();
        self.auth.logout();
        self.host.navigate_to(&self.config.login_path);
        self.settle();
    }

    /// Request a navigation and let it complete
    pub fn navigate(&self, path: &str) -> usize {
        self.host.navigate_to(path);
        self.settle()
    }

    /// Complete every queued navigation, syncing tabs as they land
    pub fn settle(&self) -> usize {
        self.host.process_pending(&self.tabs)
    }

    /// Sidebar for the current grants
    pub fn menu(&self) -> Vec<MenuItem> {
        build_menu(&self.auth.permissions().claim_tree(), &self.catalog)
    }

    pub fn tabs(&self) -> &TabSessionManager {
        &self.tabs
    }

    pub fn cache(&self) -> &RouteInstanceCache<H> {
        &self.cache
    }

    pub fn host(&self) -> &NavigationHost<H> {
        &self.host
    }

    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    pub fn permissions(&self) -> &PermissionService {
        self.auth.permissions()
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn events(&self) -> &SharedEventBus {
        &self.events
    }
}
