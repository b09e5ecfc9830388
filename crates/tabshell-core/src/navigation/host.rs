//! Reference navigation host
//!
//! Stands in for the external navigation subsystem: queues navigation
//! requests, runs the guards, detaches and attaches page instances through
//! the route reuse strategy, and reports completed navigations.
//!
//! Requests are fire-and-forget. They complete when the owner calls
//! [`NavigationHost::process_pending`]; of several requests queued in the same
//! turn only the newest completes, the older ones are cancelled and never
//! reported. A request for the URL already displayed is ignored.

use super::{NavigationListener, Navigator, PageFactory};
use crate::auth::AuthSession;
use crate::catalog::{RouteCatalog, RouteDefinition};
use crate::config::ShellConfig;
use crate::guard::{GuardDecision, auth_guard, permission_guard};
use crate::route_cache::{RouteKey, RouteReuseStrategy, strip_query};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, warn};

/// Guard redirects followed before a navigation is abandoned
const MAX_REDIRECTS: usize = 8;

/// Completion rounds per `process_pending` call
const MAX_ROUNDS: usize = 64;

/// Page currently on screen
struct AttachedPage<H> {
    route: RouteDefinition,
    instance: Arc<H>,
}

struct HostState<H> {
    current_path: String,
    attached: Option<AttachedPage<H>>,
    completed: Vec<String>,
}

/// Navigation host driving a [`RouteReuseStrategy`]
pub struct NavigationHost<H> {
    config: ShellConfig,
    catalog: Arc<RouteCatalog>,
    auth: Arc<AuthSession>,
    strategy: Arc<dyn RouteReuseStrategy<H>>,
    factory: Box<dyn PageFactory<H>>,
    queue: Mutex<VecDeque<String>>,
    state: Mutex<HostState<H>>,
}

impl<H: Send + Sync> NavigationHost<H> {
    pub fn new(
        config: ShellConfig,
        catalog: Arc<RouteCatalog>,
        auth: Arc<AuthSession>,
        strategy: Arc<dyn RouteReuseStrategy<H>>,
        factory: Box<dyn PageFactory<H>>,
    ) -> Self {
        Self {
            config,
            catalog,
            auth,
            strategy,
            factory,
            queue: Mutex::new(VecDeque::new()),
            state: Mutex::new(HostState {
                current_path: String::new(),
                attached: None,
                completed: Vec::new(),
            }),
        }
    }

    /// Complete queued navigations, reporting each to `listener`
    ///
    /// Runs until the queue stays empty, since listeners may request further
    /// navigations. Returns the number of completed navigations.
    pub fn process_pending(&self, listener: &dyn NavigationListener) -> usize {
        let mut completed = 0;

        for _ in 0..MAX_ROUNDS {
            let requests: Vec<String> = self.queue.lock().drain(..).collect();
            let Some((target, superseded)) = requests.split_last() else {
                return completed;
            };

            for path in superseded {
                debug!("Navigation to {} superseded by {}", path, target);
            }

            if let Some(path) = self.complete(target) {
                completed += 1;
                listener.navigation_completed(&path);
            }
        }

        warn!(
            "Navigation did not settle after {} rounds, {} requests left queued",
            MAX_ROUNDS,
            self.queue.lock().len()
        );
        completed
    }

    /// Resolve guards and swap pages; returns the final path if the URL changed
    fn complete(&self, requested: &str) -> Option<String> {
        let mut target = requested.to_string();
        let mut redirects = 0;

        let route = loop {
            let route = self.catalog.resolve(strip_query(&target)).cloned();
            match self.check_guards(&target, route.as_ref()) {
                GuardDecision::Allow => break route,
                GuardDecision::Redirect(to) => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        warn!("Too many redirects navigating to {}", requested);
                        return None;
                    }
                    target = to;
                }
            }
        };

        let previous = {
            let mut state = self.state.lock();
            if state.current_path == target {
                debug!("Already at {}, navigation ignored", target);
                return None;
            }
            state.current_path = target.clone();
            state.completed.push(target.clone());
            state.attached.take()
        };

        let attached = match (previous, route) {
            (Some(page), Some(next)) if self.strategy.same_route_definition(&page.route, &next) => {
                Some(page)
            }
            (previous, next) => {
                if let Some(page) = previous {
                    self.detach(page);
                }
                next.map(|route| self.attach(route))
            }
        };

        self.state.lock().attached = attached;
        Some(target)
    }

    fn check_guards(&self, target: &str, route: Option<&RouteDefinition>) -> GuardDecision {
        if self.config.is_public_path(strip_query(target)) {
            return GuardDecision::Allow;
        }

        let decision = auth_guard(&self.auth, &self.config, target);
        if !decision.is_allowed() {
            return decision;
        }

        match route {
            Some(route) => permission_guard(self.auth.permissions(), &self.config, route),
            None => GuardDecision::Allow,
        }
    }

    fn detach(&self, page: AttachedPage<H>) {
        let key = RouteKey::from_path(&page.route.path);
        if self.strategy.should_capture(&key, page.route.cacheable) {
            self.strategy.capture(&key, page.instance);
        } else {
            debug!("Destroying page {}", key);
            drop(page.instance);
        }
    }

    fn attach(&self, route: RouteDefinition) -> AttachedPage<H> {
        let key = RouteKey::from_path(&route.path);
        let restored = if self.strategy.should_restore(&key) {
            self.strategy.restore(&key)
        } else {
            None
        };

        let instance = restored.unwrap_or_else(|| {
            debug!("Creating page {}", key);
            Arc::new(self.factory.create(&route))
        });
        AttachedPage { route, instance }
    }

    /// Path of the page on screen; empty before the first navigation
    pub fn current_path(&self) -> String {
        self.state.lock().current_path.clone()
    }

    /// Catalog route of the page on screen
    pub fn current_route(&self) -> Option<RouteDefinition> {
        self.state.lock().attached.as_ref().map(|p| p.route.clone())
    }

    /// Instance of the page on screen
    pub fn current_instance(&self) -> Option<Arc<H>> {
        self.state.lock().attached.as_ref().map(|p| Arc::clone(&p.instance))
    }

    /// Every completed navigation, oldest first
    pub fn completed(&self) -> Vec<String> {
        self.state.lock().completed.clone()
    }

    /// Number of requests waiting to complete
    pub fn pending_len(&self) -> usize {
        self.queue.lock().len()
    }
}

impl<H: Send + Sync> Navigator for NavigationHost<H> {
    fn navigate_to(&self, path: &str) {
        self.queue.lock().push_back(path.to_string());
    }
}
