//! Route guards
//!
//! Primary enforcement of login and claims, run by the navigation host before
//! a page is attached. The tab session manager re-checks claims on its own.

use crate::auth::AuthSession;
use crate::catalog::RouteDefinition;
use crate::config::ShellConfig;
use crate::permission::PermissionService;
use tracing::{info, warn};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Cancel the navigation and go here instead
    Redirect(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// Require a logged-in user; otherwise redirect to login, remembering the target
pub fn auth_guard(auth: &AuthSession, config: &ShellConfig, target: &str) -> GuardDecision {
    if auth.is_authenticated() {
        return GuardDecision::Allow;
    }

    info!("Not logged in, redirecting {} to login", target);
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("returnUrl", target)
        .finish();
    GuardDecision::Redirect(format!("{}?{}", config.login_path, query))
}

/// Require the route's claim; otherwise redirect to the unauthorized page
pub fn permission_guard(
    permissions: &PermissionService,
    config: &ShellConfig,
    route: &RouteDefinition,
) -> GuardDecision {
    if route.claim.is_empty() {
        warn!("Route {} has no required claim", route.path);
        return GuardDecision::Allow;
    }

    if permissions.has_claim(&route.claim) {
        return GuardDecision::Allow;
    }

    info!("Missing claim {} for {}", route.claim, route.path);
    GuardDecision::Redirect(config.unauthorized_path.clone())
}
