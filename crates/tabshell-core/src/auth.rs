//! Auth session collaborator
//!
//! Holds the identity of the logged-in user. Credentials are checked
//! elsewhere; logging in here only replaces the grant set wholesale.

use crate::error::{ShellError, ShellResult};
use crate::permission::{GrantSet, PermissionDataset, PermissionService, User};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Current-user identity plus the permission service it drives
#[derive(Debug)]
pub struct AuthSession {
    user: RwLock<Option<User>>,
    permissions: Arc<PermissionService>,
}

impl AuthSession {
    pub fn new(permissions: Arc<PermissionService>) -> Self {
        Self {
            user: RwLock::new(None),
            permissions,
        }
    }

    /// Make `user` the current user with exactly `grants`
    pub fn login(&self, user: User, grants: GrantSet) {
        self.permissions.load_user_claims(&user, grants);
        info!("User {} logged in", user.username);
        *self.user.write() = Some(user);
    }

    /// Log in a dataset user by name with the grants the dataset lists
    pub fn login_from_dataset(
        &self,
        dataset: &PermissionDataset,
        username: &str,
    ) -> ShellResult<User> {
        let user = dataset
            .find_user(username)
            .cloned()
            .ok_or_else(|| ShellError::invalid_input(format!("Unknown user '{}'", username)))?;
        self.login(user.clone(), dataset.grants_for(user.id));
        Ok(user)
    }

    /// Forget the current user and every grant
    pub fn logout(&self) {
        if let Some(user) = self.user.write().take() {
            info!("User {} logged out", user.username);
        }
        self.permissions.clear_user_claims();
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }

    pub fn permissions(&self) -> &Arc<PermissionService> {
        &self.permissions
    }
}
