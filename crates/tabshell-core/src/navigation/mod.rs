//! Seams to the navigation subsystem
//!
//! The shell core never renders pages. It asks the navigation subsystem to
//! move to a path and is told, once per completed navigation, where the
//! navigation ended up.

pub mod host;

pub use host::NavigationHost;

use crate::catalog::RouteDefinition;

/// Fire-and-forget navigation requests
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Ask for a navigation to an absolute path; completes asynchronously
    fn navigate_to(&self, path: &str);
}

/// Receiver of "navigation completed" notifications
///
/// Called exactly once per navigation that actually completed, in completion
/// order. Superseded or cancelled navigations are never reported.
pub trait NavigationListener {
    fn navigation_completed(&self, path: &str);
}

/// Constructs fresh page instances when nothing can be restored
pub trait PageFactory<H>: Send + Sync {
    fn create(&self, route: &RouteDefinition) -> H;
}

impl<H, F> PageFactory<H> for F
where
    F: Fn(&RouteDefinition) -> H + Send + Sync,
{
    fn create(&self, route: &RouteDefinition) -> H {
        self(route)
    }
}
