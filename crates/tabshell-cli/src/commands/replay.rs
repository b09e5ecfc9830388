//! `replay`: drive a shell from a script of tab commands

use crate::console::CliConsole;
use crate::workspace::Workspace;
use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tabshell_core::menu::find_item;
use tabshell_core::{EventFilter, FilteredSubscriber, ShellEvent};
use tracing::debug;

/// One script line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Login(String),
    Logout,
    Nav(String),
    /// Click the menu entry with this claim code
    Open(String),
    /// Click an open tab
    Switch(String),
    Close(String),
    CloseOthers(String),
    CloseAll,
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or_else(|| anyhow!("empty line"))?;
        let arg = words.next();
        if words.next().is_some() {
            bail!("too many arguments to '{}'", command);
        }

        let required = |name: &str| {
            arg.map(str::to_string)
                .ok_or_else(|| anyhow!("'{}' needs a {}", command, name))
        };
        let no_arg = |step: Step| match arg {
            Some(_) => Err(anyhow!("'{}' takes no argument", command)),
            None => Ok(step),
        };

        match command {
            "login" => required("username").map(Step::Login),
            "logout" => no_arg(Step::Logout),
            "nav" => required("path").map(Step::Nav),
            "open" => required("claim code").map(Step::Open),
            "switch" => required("tab id").map(Step::Switch),
            "close" => required("tab id").map(Step::Close),
            "close-others" => required("tab id").map(Step::CloseOthers),
            "close-all" => no_arg(Step::CloseAll),
            other => Err(anyhow!("unknown command '{}'", other)),
        }
    }
}

/// Parsed script line with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line_no: usize,
    pub text: String,
    pub step: Step,
}

/// Parse a whole script; blank lines and `#` comments are skipped
pub fn parse_script(source: &str) -> Result<Vec<ScriptLine>> {
    source
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, text)| !text.is_empty() && !text.starts_with('#'))
        .map(|(line_no, text)| {
            let step = text
                .parse()
                .with_context(|| format!("line {}: {}", line_no, text))?;
            Ok(ScriptLine {
                line_no,
                text: text.to_string(),
                step,
            })
        })
        .collect()
}

pub fn replay(
    workspace: &Workspace,
    script: &Path,
    user: Option<&str>,
    keep_going: bool,
) -> Result<()> {
    let source = fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let lines = parse_script(&source)?;
    let console = CliConsole;

    if let Some(user) = user {
        workspace.login(user)?;
        console.success(&format!("Logged in as {}", user));
    }

    let mut cache_events = FilteredSubscriber::new(
        workspace.shell.events(),
        EventFilter::new().only_types(CACHE_EVENTS.to_vec()),
    );

    let mut failures = 0;
    for line in &lines {
        console.print_step(line.line_no, &line.text);
        if let Err(e) = apply(workspace, &line.step) {
            failures += 1;
            console.error(&format!("line {}: {:#}", line.line_no, e));
            if !keep_going {
                return Err(e.context(format!("Replay stopped at line {}", line.line_no)));
            }
        }
        print_state(workspace, &console);
        console.print_cache_events(&describe_cache_events(&cache_events.drain()));
    }

    if failures > 0 {
        console.warn(&format!("{} of {} lines failed", failures, lines.len()));
    } else {
        console.success(&format!("Replayed {} lines", lines.len()));
    }
    Ok(())
}

/// Run one step and let the navigations it requested complete
pub fn apply(workspace: &Workspace, step: &Step) -> Result<()> {
    let shell = &workspace.shell;
    let tabs = shell.tabs();
    debug!("Applying {:?}", step);

    match step {
        Step::Login(user) => workspace.login(user)?,
        Step::Logout => shell.logout(),
        Step::Nav(path) => {
            shell.navigate(path);
        }
        Step::Open(code) => {
            let menu = shell.menu();
            let item =
                find_item(&menu, code).ok_or_else(|| anyhow!("no menu entry for {}", code))?;
            let tab = item
                .to_tab(shell.config().tab_id_joiner)
                .ok_or_else(|| anyhow!("menu entry {} is a group", code))?;
            tabs.open_tab(tab);
        }
        Step::Switch(id) => {
            let tab = tabs.tab(id).ok_or_else(|| anyhow!("no open tab {}", id))?;
            tabs.open_tab(tab);
        }
        Step::Close(id) => {
            if tabs.tab(id).is_none() {
                bail!("no open tab {}", id);
            }
            tabs.close_tab(id);
        }
        Step::CloseOthers(id) => {
            if !tabs.close_other_tabs(id) {
                bail!("no open tab {}", id);
            }
        }
        Step::CloseAll => tabs.close_all_tabs(),
    }

    shell.settle();
    Ok(())
}

/// Cache transitions reported after each step
const CACHE_EVENTS: [&str; 4] = [
    "route_captured",
    "route_restored",
    "route_evicted",
    "capture_suppressed",
];

/// One short phrase per cache transition, in publication order
pub fn describe_cache_events(events: &[ShellEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|event| match event {
            ShellEvent::RouteCaptured { key } => Some(format!("kept {}", key)),
            ShellEvent::RouteRestored { key } => Some(format!("restored {}", key)),
            ShellEvent::RouteEvicted { key } => Some(format!("evicted {}", key)),
            ShellEvent::CaptureSuppressed { key } => Some(format!("dropped {}", key)),
            _ => None,
        })
        .collect()
}

fn print_state(workspace: &Workspace, console: &CliConsole) {
    let shell = &workspace.shell;
    let screen = match shell.host().current_instance() {
        Some(page) => format!("{} (page #{})", shell.host().current_path(), page.serial),
        None => shell.host().current_path(),
    };
    console.print_tabs(&shell.tabs().tabs(), &shell.tabs().active_tab_id(), &screen);
}
