//! Claim data structures
//!
//! A claim is one authorization record: either a navigable page (ROUTE) or a
//! UI action (ACTION). Claims form a forest through `parent_id`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stable claim identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(pub u64);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ClaimId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The set of claim ids a user currently holds
pub type GrantSet = HashSet<ClaimId>;

/// Claim kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimKind {
    /// Page access
    Route,
    /// Button or other in-page action
    Action,
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimKind::Route => write!(f, "ROUTE"),
            ClaimKind::Action => write!(f, "ACTION"),
        }
    }
}

/// Authorization record, immutable once loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    /// Unique identifier
    pub id: ClaimId,

    /// Unique human-meaningful key, e.g. `BASIC_SYSTEM_LOG`
    pub code: String,

    /// Display label
    pub name: String,

    /// Page or action
    #[serde(rename = "type")]
    pub kind: ClaimKind,

    /// Functional module the claim belongs to
    #[serde(default)]
    pub module: String,

    /// Parent claim; `None` for roots
    #[serde(default)]
    pub parent_id: Option<ClaimId>,
}

impl Claim {
    /// Create a root route claim
    pub fn route(id: u64, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ClaimId(id),
            code: code.into(),
            name: name.into(),
            kind: ClaimKind::Route,
            module: String::new(),
            parent_id: None,
        }
    }

    /// Create a root action claim
    pub fn action(id: u64, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: ClaimKind::Action,
            ..Self::route(id, code, name)
        }
    }

    /// Attach the claim under a parent
    pub fn with_parent(mut self, parent: u64) -> Self {
        self.parent_id = Some(ClaimId(parent));
        self
    }

    /// Set the module label
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    /// Whether the claim has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Claim plus its permitted children, in catalog order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimTreeNode {
    /// The claim at this node
    #[serde(flatten)]
    pub claim: Claim,

    /// Permitted children
    pub children: Vec<ClaimTreeNode>,
}

impl ClaimTreeNode {
    /// Depth-first, parent-before-children traversal of this subtree
    pub fn iter(&self) -> impl Iterator<Item = &ClaimTreeNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in this subtree
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Iterate every node of a forest in display order
pub fn walk_forest(forest: &[ClaimTreeNode]) -> impl Iterator<Item = &ClaimTreeNode> {
    forest.iter().flat_map(|root| root.iter())
}
