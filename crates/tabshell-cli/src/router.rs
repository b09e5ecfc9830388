//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::workspace::Workspace;
use anyhow::Result;
use tabshell_core::ShellConfig;

/// Route CLI commands to their respective handlers
pub fn route(cli: Cli, config: ShellConfig) -> Result<()> {
    let workspace = Workspace::load(config, &cli.permissions, &cli.catalog)?;

    match &cli.command {
        Commands::Menu { user, json } => commands::menu::show_menu(&workspace, user, *json),
        Commands::Tree { user } => commands::menu::show_tree(&workspace, user),
        Commands::Replay {
            script,
            user,
            keep_going,
        } => commands::replay::replay(&workspace, script, user.as_deref(), *keep_going),
    }
}
