//! Current user's permissions
//!
//! Owns the immutable claim catalog and the current grant set. The grant set
//! is only ever replaced wholesale (login) or emptied (logout); the permitted
//! claim tree is rebuilt from scratch on every replacement.

use super::claim::{Claim, ClaimTreeNode, GrantSet};
use super::dataset::User;
use super::tree::build_tree;
use crate::events::{ShellEvent, SharedEventBus};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct GrantState {
    user: Option<User>,
    granted: GrantSet,
    tree: Arc<Vec<ClaimTreeNode>>,
    loaded: bool,
}

/// Permission service for the logged-in user
#[derive(Debug)]
pub struct PermissionService {
    /// Full catalog, in load order
    claims: Vec<Claim>,
    /// Claim code to catalog position
    by_code: HashMap<String, usize>,
    /// Current grants and the tree derived from them
    state: RwLock<GrantState>,
    events: SharedEventBus,
}

impl PermissionService {
    /// Create a service over a claim catalog with nothing granted
    pub fn new(claims: Vec<Claim>, events: SharedEventBus) -> Self {
        let mut by_code = HashMap::with_capacity(claims.len());
        for (pos, claim) in claims.iter().enumerate() {
            by_code.entry(claim.code.clone()).or_insert(pos);
        }

        Self {
            claims,
            by_code,
            state: RwLock::new(GrantState::default()),
            events,
        }
    }

    /// Replace the grant set with the given user's grants
    pub fn load_user_claims(&self, user: &User, granted: GrantSet) {
        let tree = Arc::new(build_tree(&self.claims, &granted));
        let count = granted.len();

        {
            let mut state = self.state.write();
            state.user = Some(user.clone());
            state.granted = granted;
            state.tree = tree;
            state.loaded = true;
        }

        info!("Loaded {} claims for user {}", count, user.username);
        self.events.publish(ShellEvent::GrantsReplaced {
            user_id: user.id,
            granted: count,
        });
    }

    /// Drop every grant (logout)
    pub fn clear_user_claims(&self) {
        *self.state.write() = GrantState::default();
        info!("Cleared user claims");
        self.events.publish(ShellEvent::GrantsCleared);
    }

    /// Whether the current grant set contains the claim with this code
    ///
    /// Unknown codes are treated as not granted.
    pub fn has_claim(&self, code: &str) -> bool {
        let Some(claim) = self.claim_by_code(code) else {
            warn!("Claim code {} does not exist", code);
            return false;
        };
        let granted = self.state.read().granted.contains(&claim.id);
        debug!("has_claim({}) = {}", code, granted);
        granted
    }

    /// Look up a claim in the catalog by code
    pub fn claim_by_code(&self, code: &str) -> Option<&Claim> {
        self.by_code.get(code).map(|&pos| &self.claims[pos])
    }

    /// Full claim catalog
    pub fn catalog(&self) -> &[Claim] {
        &self.claims
    }

    /// Granted claims, in catalog order
    pub fn user_claims(&self) -> Vec<Claim> {
        let state = self.state.read();
        self.claims
            .iter()
            .filter(|c| state.granted.contains(&c.id))
            .cloned()
            .collect()
    }

    /// Permitted claim forest for the current grant set
    pub fn claim_tree(&self) -> Arc<Vec<ClaimTreeNode>> {
        Arc::clone(&self.state.read().tree)
    }

    /// Copy of the current grant set
    pub fn granted(&self) -> GrantSet {
        self.state.read().granted.clone()
    }

    /// User whose grants are loaded
    pub fn current_user(&self) -> Option<User> {
        self.state.read().user.clone()
    }

    /// Whether a user's grants have been loaded
    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }
}
