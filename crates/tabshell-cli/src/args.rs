//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "tabshell.toml";

#[derive(Parser)]
#[command(name = "tabshell")]
#[command(about = "Permission-gated tab workspace driver")]
#[command(
    long_about = r#"Permission-gated tab workspace driver

USAGE:
  tabshell menu --user <name>                  # Print the sidebar a user sees
  tabshell tree --user <name>                  # Print the permitted claim tree
  tabshell replay --script <file>              # Replay navigations and tab commands

Data files may be JSON, TOML or YAML, chosen by extension."#
)]
#[command(version)]
pub struct Cli {
    /// Path to the shell configuration file; defaults apply when it is missing
    #[arg(long, env = "TABSHELL_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Claims, users and grants
    #[arg(long, env = "TABSHELL_PERMISSIONS")]
    pub permissions: PathBuf,

    /// Route catalog
    #[arg(long, env = "TABSHELL_CATALOG")]
    pub catalog: PathBuf,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the sidebar menu for a user
    Menu {
        /// Username from the permission dataset
        #[arg(long, short)]
        user: String,

        /// Print the menu as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the permitted claim tree for a user, action claims included
    Tree {
        /// Username from the permission dataset
        #[arg(long, short)]
        user: String,
    },

    /// Replay a script of shell commands, printing the tab bar after each step
    ///
    /// Script lines:
    ///   login <user>          nav <path>          open <claim code>
    ///   switch <tab id>       close <tab id>      close-others <tab id>
    ///   close-all             logout
    /// Blank lines and lines starting with '#' are skipped.
    #[command(verbatim_doc_comment)]
    Replay {
        /// Script file
        #[arg(long, short)]
        script: PathBuf,

        /// Log in as this user before the first line
        #[arg(long, short)]
        user: Option<String>,

        /// Keep going after a line fails
        #[arg(long)]
        keep_going: bool,
    },
}
