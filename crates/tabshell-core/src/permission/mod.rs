//! Permission model
//!
//! Flat claim records with parent pointers, the per-user grant set, and the
//! permitted claim forest derived from both.

pub mod claim;
pub mod dataset;
pub mod service;
pub mod tree;

pub use claim::{Claim, ClaimId, ClaimKind, ClaimTreeNode, GrantSet, walk_forest};
pub use dataset::{PermissionDataset, User, UserClaim};
pub use service::PermissionService;
pub use tree::build_tree;
