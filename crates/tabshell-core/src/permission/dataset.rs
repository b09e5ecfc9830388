//! Permission dataset loading
//!
//! The dataset bundles the claim catalog, the known users and the
//! user-to-claim association rows. It is the shape the backend exports.

use super::claim::{Claim, ClaimId, GrantSet};
use crate::config::load_structured;
use crate::error::{ShellError, ShellResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Logged-in user identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn new(id: u64, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: String::new(),
        }
    }
}

/// One user-to-claim association row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserClaim {
    pub user_id: u64,
    pub claim_id: ClaimId,
}

/// Claims, users and grants as exported by the backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDataset {
    #[serde(default)]
    pub users: Vec<User>,

    pub claims: Vec<Claim>,

    #[serde(default)]
    pub user_claims: Vec<UserClaim>,
}

impl PermissionDataset {
    /// Load a dataset from a JSON, TOML or YAML file
    pub fn load(path: &Path) -> ShellResult<Self> {
        let dataset: Self = load_structured(path).map_err(|e| {
            ShellError::permission(format!("Failed to load '{}': {}", path.display(), e))
        })?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Reject duplicate claim ids or codes
    pub fn validate(&self) -> ShellResult<()> {
        let mut ids = HashSet::new();
        let mut codes = HashSet::new();
        for claim in &self.claims {
            if !ids.insert(claim.id) {
                return Err(ShellError::permission(format!(
                    "Duplicate claim id {}",
                    claim.id
                )));
            }
            if !codes.insert(claim.code.as_str()) {
                return Err(ShellError::permission(format!(
                    "Duplicate claim code '{}'",
                    claim.code
                )));
            }
        }
        Ok(())
    }

    /// Grant set of a user; empty for unknown users
    pub fn grants_for(&self, user_id: u64) -> GrantSet {
        self.user_claims
            .iter()
            .filter(|uc| uc.user_id == user_id)
            .map(|uc| uc.claim_id)
            .collect()
    }

    /// Find a user by name
    pub fn find_user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Find a user by id
    pub fn user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }
}
