//! Sidebar menu projection of the permitted claim tree

use crate::catalog::RouteCatalog;
use crate::permission::{ClaimKind, ClaimTreeNode};
use crate::tabs::Tab;
use serde::Serialize;

/// One sidebar entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Claim code
    pub id: String,

    pub label: String,

    /// Absolute path opened when the entry is clicked; `None` for groups
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// Tab opened by clicking this entry
    pub fn to_tab(&self, joiner: char) -> Option<Tab> {
        self.route
            .as_deref()
            .map(|route| Tab::new(self.label.clone(), route, joiner))
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Build the sidebar from the permitted claim forest
///
/// Action claims never show up. Route claims become clickable when the
/// catalog has a page for them; entries that are neither clickable nor have
/// visible children are left out.
pub fn build_menu(tree: &[ClaimTreeNode], catalog: &RouteCatalog) -> Vec<MenuItem> {
    tree.iter().filter_map(|node| menu_item(node, catalog)).collect()
}

fn menu_item(node: &ClaimTreeNode, catalog: &RouteCatalog) -> Option<MenuItem> {
    if node.claim.kind == ClaimKind::Action {
        return None;
    }

    let children = build_menu(&node.children, catalog);
    let route = catalog
        .route_for_claim(&node.claim.code)
        .map(|r| r.absolute_path());

    if route.is_none() && children.is_empty() {
        return None;
    }

    Some(MenuItem {
        id: node.claim.code.clone(),
        label: node.claim.name.clone(),
        route,
        children,
    })
}

/// Find the menu entry for a claim code anywhere in the menu
pub fn find_item<'a>(menu: &'a [MenuItem], id: &str) -> Option<&'a MenuItem> {
    menu.iter().find_map(|item| {
        if item.id == id {
            Some(item)
        } else {
            find_item(&item.children, id)
        }
    })
}
