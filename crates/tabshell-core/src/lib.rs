//! Tab-scoped navigation cache for a permission-gated workspace
//!
//! This crate decides which page instance exists, whether its state survives
//! a navigation, and which menu and tab entries the current user may see:
//! - Permission tree: permitted claim forest from flat parent-pointer records
//! - Route instance cache: keeps detached pages alive until their tab closes
//! - Tab session manager: ordered tabs and the active tab, synced from
//!   completed navigations

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod guard;
pub mod menu;
pub mod navigation;
pub mod permission;
pub mod route_cache;
pub mod shell;
pub mod tabs;

pub use auth::AuthSession;
pub use catalog::{RouteCatalog, RouteDefinition};
pub use config::{LogFormat, LoggingConfig, ShellConfig};
pub use error::{ShellError, ShellResult};
pub use events::{EventBus, EventFilter, FilteredSubscriber, SharedEventBus, ShellEvent};
pub use guard::{GuardDecision, auth_guard, permission_guard};
pub use menu::{MenuItem, build_menu};
pub use navigation::{NavigationHost, NavigationListener, Navigator, PageFactory};
pub use permission::{
    Claim, ClaimId, ClaimKind, ClaimTreeNode, GrantSet, PermissionDataset, PermissionService,
    User, build_tree,
};
pub use route_cache::{
    CacheInvalidation, EntryState, RouteInstanceCache, RouteKey, RouteReuseStrategy,
};
pub use shell::Shell;
pub use tabs::{Tab, TabSessionManager};
