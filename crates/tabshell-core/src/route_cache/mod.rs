//! Route instance cache
//!
//! Decides whether a page instance that is being navigated away from is kept
//! alive (detached and stored) or destroyed, and hands stored instances back
//! when their route is attached again.
//!
//! ## Lifecycle per route key
//!
//! - **Fresh**: nothing stored
//! - **Cached**: a detached instance is stored and will be restored
//! - **PendingEviction**: the route's tab was closed; the next capture attempt
//!   for the key is refused exactly once

pub mod cache;
pub mod key;

pub use cache::{EntryState, RouteInstanceCache};
pub use key::{RouteKey, strip_query};

use crate::catalog::RouteDefinition;
use std::sync::Arc;

/// Capability the navigation subsystem drives while detaching and attaching
/// page instances
pub trait RouteReuseStrategy<H>: Send + Sync {
    /// Whether the instance leaving `key` should be stored instead of destroyed
    fn should_capture(&self, key: &RouteKey, cacheable: bool) -> bool;

    /// Store a detached instance; only called after `should_capture` said yes
    fn capture(&self, key: &RouteKey, instance: Arc<H>);

    /// Whether a stored instance exists for `key`
    fn should_restore(&self, key: &RouteKey) -> bool;

    /// Stored instance for `key`; the entry stays cached
    fn restore(&self, key: &RouteKey) -> Option<Arc<H>>;

    /// Whether two transitions target the same logical route, in which case
    /// neither capture nor restore applies
    fn same_route_definition(&self, a: &RouteDefinition, b: &RouteDefinition) -> bool {
        a == b
    }
}

/// Commands the tab session manager issues when tabs close
#[cfg_attr(test, mockall::automock)]
pub trait CacheInvalidation: Send + Sync {
    /// Drop the stored instance for `key` and refuse its next capture
    fn request_close(&self, key: &RouteKey);

    /// Drop every stored instance and every eviction mark
    fn clear_all(&self);
}
