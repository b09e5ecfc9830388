//! Terminal rendering of menus, claim trees and the tab bar

use colored::*;
use tabshell_core::{ClaimKind, ClaimTreeNode, MenuItem, Tab};

/// CLI console for formatted output
pub struct CliConsole;

impl CliConsole {
    /// Print a success message
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    /// Print a header
    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Print a script step
    pub fn print_step(&self, line_no: usize, line: &str) {
        println!("{} {}", format!("{:>3}>", line_no).dimmed(), line.bold());
    }

    pub fn print_menu(&self, menu: &[MenuItem]) {
        if menu.is_empty() {
            println!("{}", "(no menu entries)".dimmed());
        }
        for line in menu_lines(menu, 0) {
            println!("{}", line);
        }
    }

    pub fn print_tree(&self, tree: &[ClaimTreeNode]) {
        if tree.is_empty() {
            println!("{}", "(no claims granted)".dimmed());
        }
        for line in tree_lines(tree, 0) {
            println!("{}", line);
        }
    }

    /// Print the cache transitions of the last step, if any
    pub fn print_cache_events(&self, events: &[String]) {
        if !events.is_empty() {
            println!("    {} {}", "cache:".dimmed(), events.join(", "));
        }
    }

    /// Print the tab bar plus the page on screen
    pub fn print_tabs(&self, tabs: &[Tab], active_id: &str, screen: &str) {
        println!("    {} {}", "tabs:".dimmed(), tab_bar(tabs, active_id));
        println!("    {} {}", "screen:".dimmed(), screen);
    }
}

fn menu_lines(menu: &[MenuItem], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for item in menu {
        let indent = "  ".repeat(depth);
        let line = match &item.route {
            Some(route) => format!("{}- {} {}", indent, item.label, route.dimmed()),
            None => format!("{}+ {}", indent, item.label.bold()),
        };
        lines.push(line);
        lines.extend(menu_lines(&item.children, depth + 1));
    }
    lines
}

fn tree_lines(tree: &[ClaimTreeNode], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for node in tree {
        let kind = match node.claim.kind {
            ClaimKind::Route => "ROUTE".cyan(),
            ClaimKind::Action => "ACTION".magenta(),
        };
        lines.push(format!(
            "{}{} {} [{}]",
            "  ".repeat(depth),
            node.claim.code,
            node.claim.name.dimmed(),
            kind
        ));
        lines.extend(tree_lines(&node.children, depth + 1));
    }
    lines
}

/// Tab bar as one line; the active tab is bracketed
pub fn tab_bar(tabs: &[Tab], active_id: &str) -> String {
    if tabs.is_empty() {
        return "(none)".to_string();
    }
    tabs.iter()
        .map(|tab| {
            if tab.id == active_id {
                format!("[{}]", tab.id)
            } else {
                tab.id.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_bar_brackets_active_tab() {
        let tabs = vec![
            Tab::new("Log", "/basic-system/log", '-'),
            Tab::new("Vendor", "/external-system/vendor-data", '-'),
        ];
        assert_eq!(
            tab_bar(&tabs, "external-system-vendor-data"),
            "basic-system-log [external-system-vendor-data]"
        );
        assert_eq!(tab_bar(&[], ""), "(none)");
    }

    #[test]
    fn test_menu_lines_indent_children() {
        colored::control::set_override(false);
        let menu = vec![MenuItem {
            id: "BASIC_SYSTEM".into(),
            label: "Basic System".into(),
            route: None,
            children: vec![MenuItem {
                id: "BASIC_SYSTEM_LOG".into(),
                label: "System Log".into(),
                route: Some("/basic-system/log".into()),
                children: Vec::new(),
            }],
        }];

        assert_eq!(
            menu_lines(&menu, 0),
            vec!["+ Basic System", "  - System Log /basic-system/log"]
        );
    }
}
