//! Claim tree construction
//!
//! Builds the permitted forest from the flat claim catalog in two passes over
//! an arena: materialize one slot per granted claim, then link each slot to
//! its parent slot. A node whose parent is not itself granted is dropped
//! together with its subtree; it is never promoted to a root.

use super::claim::{Claim, ClaimId, ClaimTreeNode, GrantSet};
use std::collections::HashMap;
use tracing::debug;

/// Arena of granted claims with parent/child adjacency
struct ClaimArena<'a> {
    claims: Vec<&'a Claim>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl<'a> ClaimArena<'a> {
    fn materialize(claims: &'a [Claim], granted: &GrantSet) -> (Self, HashMap<ClaimId, usize>) {
        let claims: Vec<&Claim> = claims.iter().filter(|c| granted.contains(&c.id)).collect();

        let mut index = HashMap::with_capacity(claims.len());
        for (slot, claim) in claims.iter().enumerate() {
            index.entry(claim.id).or_insert(slot);
        }

        let arena = Self {
            children: vec![Vec::new(); claims.len()],
            roots: Vec::new(),
            claims,
        };
        (arena, index)
    }

    fn link(&mut self, index: &HashMap<ClaimId, usize>) {
        for slot in 0..self.claims.len() {
            let claim = self.claims[slot];
            match claim.parent_id {
                None => self.roots.push(slot),
                Some(parent) => match index.get(&parent) {
                    Some(&parent_slot) if parent_slot != slot => {
                        self.children[parent_slot].push(slot);
                    }
                    _ => {
                        debug!(
                            "Dropping claim {} ({}): parent {} not granted",
                            claim.id, claim.code, parent
                        );
                    }
                },
            }
        }
    }

    fn node(&self, slot: usize) -> ClaimTreeNode {
        ClaimTreeNode {
            claim: self.claims[slot].clone(),
            children: self.children[slot].iter().map(|&c| self.node(c)).collect(),
        }
    }

    fn into_forest(self) -> Vec<ClaimTreeNode> {
        self.roots.iter().map(|&slot| self.node(slot)).collect()
    }
}

/// Build the permitted claim forest
///
/// Sibling order follows the catalog's order; no sort is applied. Nodes
/// whose parent id is unknown or not granted are excluded. Claims caught in
/// a parent cycle never reach a root and are excluded the same way.
pub fn build_tree(claims: &[Claim], granted: &GrantSet) -> Vec<ClaimTreeNode> {
    let (mut arena, index) = ClaimArena::materialize(claims, granted);
    arena.link(&index);
    arena.into_forest()
}
