//! `menu` and `tree`: what a user is allowed to see

use crate::console::CliConsole;
use crate::workspace::Workspace;
use anyhow::Result;

pub fn show_menu(workspace: &Workspace, user: &str, json: bool) -> Result<()> {
    workspace.login(user)?;
    let menu = workspace.shell.menu();

    if json {
        println!("{}", serde_json::to_string_pretty(&menu)?);
        return Ok(());
    }

    let console = CliConsole;
    console.print_header(&format!("Menu for {}", user));
    console.print_menu(&menu);
    Ok(())
}

pub fn show_tree(workspace: &Workspace, user: &str) -> Result<()> {
    workspace.login(user)?;
    let permissions = workspace.shell.permissions();

    let console = CliConsole;
    console.print_header(&format!(
        "Claim tree for {} ({} of {} claims granted)",
        user,
        permissions.granted().len(),
        permissions.catalog().len()
    ));
    console.print_tree(&permissions.claim_tree());
    Ok(())
}
