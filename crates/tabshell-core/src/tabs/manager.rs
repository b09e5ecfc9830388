//! Tab session manager
//!
//! Owns the ordered tab list and the active-tab pointer, turns completed
//! navigations into tabs, and tells the route instance cache which routes
//! must not survive because their tab was closed.

use super::tab::{Tab, tab_id};
use crate::catalog::{RouteCatalog, normalize_path};
use crate::config::ShellConfig;
use crate::events::{ShellEvent, SharedEventBus};
use crate::navigation::{NavigationListener, Navigator};
use crate::permission::PermissionService;
use crate::route_cache::{CacheInvalidation, RouteKey, strip_query};
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct TabState {
    /// Open tabs in tab-bar order
    tabs: Vec<Tab>,
    /// Id of the active tab; empty when no tab is active
    active_id: String,
    /// Catalog route of the last completed navigation; `None` when it
    /// landed on a reserved or unknown path
    displayed: Option<RouteKey>,
}

/// What the tab bar shows after a tab is removed
enum AfterClose {
    Stay,
    Activate(Tab),
    Home,
}

impl TabState {
    fn position(&self, id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == id)
    }
}

/// Tab session manager
pub struct TabSessionManager {
    state: RwLock<TabState>,
    config: ShellConfig,
    catalog: Arc<RouteCatalog>,
    permissions: Arc<PermissionService>,
    cache: Arc<dyn CacheInvalidation>,
    navigator: Arc<dyn Navigator>,
    events: SharedEventBus,
}

impl TabSessionManager {
    /// Create a manager with no open tabs
    pub fn new(
        config: ShellConfig,
        catalog: Arc<RouteCatalog>,
        permissions: Arc<PermissionService>,
        cache: Arc<dyn CacheInvalidation>,
        navigator: Arc<dyn Navigator>,
        events: SharedEventBus,
    ) -> Self {
        Self {
            state: RwLock::new(TabState::default()),
            config,
            catalog,
            permissions,
            cache,
            navigator,
            events,
        }
    }

    /// Open a tab, or switch to it if it is already open
    ///
    /// Navigation is always requested so the displayed page matches the tab.
    pub fn open_tab(&self, tab: Tab) {
        let (route, opened, activated) = {
            let mut state = self.state.write();
            let (route, opened) = match state.position(&tab.id) {
                Some(pos) => (state.tabs[pos].route.clone(), false),
                None => {
                    let route = tab.route.clone();
                    state.tabs.push(tab.clone());
                    (route, true)
                }
            };
            let activated = state.active_id != tab.id;
            state.active_id = tab.id.clone();
            (route, opened, activated)
        };

        if opened {
            info!("Opened tab {} ({})", tab.id, route);
            self.events.publish(ShellEvent::TabOpened { id: tab.id.clone() });
        }
        if activated {
            self.events.publish(ShellEvent::TabActivated { id: tab.id });
        }
        self.navigator.navigate_to(&route);
    }

    /// Close a tab; unknown ids are ignored
    ///
    /// Closing the active tab activates its left neighbour (or the new first
    /// tab). Closing the last tab navigates home.
    pub fn close_tab(&self, id: &str) {
        let Some(route_key) = self
            .state
            .read()
            .tabs
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.route_key())
        else {
            debug!("close_tab: no open tab {}", id);
            return;
        };

        self.cache.request_close(&route_key);

        let after = {
            let mut state = self.state.write();
            let Some(index) = state.position(id) else {
                return;
            };
            state.tabs.remove(index);

            if state.tabs.is_empty() {
                state.active_id.clear();
                AfterClose::Home
            } else if state.active_id == id {
                let next = state.tabs[index.saturating_sub(1)].clone();
                state.active_id = next.id.clone();
                AfterClose::Activate(next)
            } else {
                AfterClose::Stay
            }
        };

        info!("Closed tab {}", id);
        self.events.publish(ShellEvent::TabClosed { id: id.to_string() });

        match after {
            AfterClose::Activate(tab) => {
                self.events.publish(ShellEvent::TabActivated { id: tab.id.clone() });
                self.navigator.navigate_to(&tab.route);
            }
            AfterClose::Home => self.navigator.navigate_to(&self.config.home_path),
            AfterClose::Stay => {}
        }
    }

    /// Keep only the tab `id`; returns false when it is not open
    pub fn close_other_tabs(&self, id: &str) -> bool {
        let (closed, kept, was_active) = {
            let mut state = self.state.write();
            let Some(pos) = state.position(id) else {
                debug!("close_other_tabs: no open tab {}", id);
                return false;
            };
            let kept = state.tabs.remove(pos);
            let closed = std::mem::replace(&mut state.tabs, vec![kept.clone()]);
            let was_active = state.active_id == id;
            state.active_id = kept.id.clone();
            (closed, kept, was_active)
        };

        for tab in &closed {
            self.cache.request_close(&tab.route_key());
            self.events.publish(ShellEvent::TabClosed { id: tab.id.clone() });
        }
        info!("Closed {} tabs, kept {}", closed.len(), kept.id);

        if !was_active {
            self.events.publish(ShellEvent::TabActivated { id: kept.id.clone() });
            self.navigator.navigate_to(&kept.route);
        }
        true
    }

    /// Close every tab, drop every cached page and navigate home
    pub fn close_all_tabs(&self) {
        let displayed = {
            let mut state = self.state.write();
            state.tabs.clear();
            state.active_id.clear();
            state.displayed.clone()
        };

        self.cache.clear_all();
        // the page on screen is detached by the navigation home
        if let Some(key) = &displayed {
            self.cache.request_close(key);
        }

        info!("Closed all tabs");
        self.events.publish(ShellEvent::TabsCleared);
        self.navigator.navigate_to(&self.config.home_path);
    }

    /// Switch the active tab without navigating; unknown ids are ignored
    pub fn set_active_tab(&self, id: &str) {
        let changed = {
            let mut state = self.state.write();
            if state.position(id).is_none() {
                warn!("set_active_tab: no open tab {}", id);
                return;
            }
            let changed = state.active_id != id;
            state.active_id = id.to_string();
            changed
        };

        if changed {
            self.events.publish(ShellEvent::TabActivated { id: id.to_string() });
        }
    }

    /// Turn a completed navigation into an open, active tab
    ///
    /// Reserved paths never become tabs. Paths missing from the catalog and
    /// paths whose claim is not granted are logged and ignored.
    pub fn sync_tab_from_route(&self, full_path: &str) {
        let clean_path = strip_query(full_path);
        if self.config.is_reserved_path(clean_path) {
            self.state.write().displayed = None;
            return;
        }

        let relative = normalize_path(clean_path);
        let route = self.catalog.resolve(relative);
        self.state.write().displayed = route.map(|r| RouteKey::from_path(&r.path));
        let Some(route) = route else {
            warn!("No route registered for {}, no tab created", clean_path);
            return;
        };

        if !self.permissions.has_claim(&route.claim) {
            warn!(
                "Route {} requires claim {} which is not granted, no tab created",
                clean_path, route.claim
            );
            return;
        }

        let title = self
            .permissions
            .claim_by_code(&route.claim)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| route.path.clone());

        let tab = Tab {
            id: tab_id(relative, self.config.tab_id_joiner),
            title,
            route: format!("/{}", relative),
            closable: true,
        };
        self.open_tab(tab);
    }

    /// Open tabs in tab-bar order
    pub fn tabs(&self) -> Vec<Tab> {
        self.state.read().tabs.clone()
    }

    /// Id of the active tab; empty when none is active
    pub fn active_tab_id(&self) -> String {
        self.state.read().active_id.clone()
    }

    /// The active tab
    pub fn active_tab(&self) -> Option<Tab> {
        let state = self.state.read();
        state.position(&state.active_id).map(|pos| state.tabs[pos].clone())
    }

    /// Look up an open tab
    pub fn tab(&self, id: &str) -> Option<Tab> {
        let state = self.state.read();
        state.position(id).map(|pos| state.tabs[pos].clone())
    }

    pub fn tab_count(&self) -> usize {
        self.state.read().tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().tabs.is_empty()
    }

    /// Subscribe to tab, cache and grant changes
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.events.subscribe()
    }
}

impl NavigationListener for TabSessionManager {
    fn navigation_completed(&self, path: &str) {
        self.sync_tab_from_route(path);
    }
}
