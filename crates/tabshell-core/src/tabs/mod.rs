//! Tab sessions
//!
//! ## Tab lifecycle
//!
//! `Absent -> Open(Active) <-> Open(Inactive) -> Absent`. At most one open tab
//! is active; none is active exactly when no tab is open.

pub mod manager;
pub mod tab;

pub use manager::TabSessionManager;
pub use tab::{Tab, tab_id};
