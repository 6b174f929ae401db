//! Scriptable console front-end
//!
//! Non-interactive subcommands over the same inventories the TUI uses:
//! `list` prints an inventory, `actions` prints the full catalog for a
//! kind, `invoke` runs one action against one target, `export` is a
//! shorthand for the export actions. Failures map to distinct exit codes
//! so scripts can tell an ineligible action (3) from a vanished target
//! (4) or an OS rejection (5).

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::app::build_inventories;
use crate::core::{ActionOutcome, EntityKind, Inventory, RefreshMode, Verb};

/// Exit code for an enumeration failure, distinct from action failures.
const EXIT_ENUMERATE: i32 = 2;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Services,
    Drivers,
    Processes,
    Modules,
    Connections,
    Tasks,
    Programs,
    Env,
    Windows,
}

impl KindArg {
    fn kind(self) -> EntityKind {
        match self {
            KindArg::Services => EntityKind::Service,
            KindArg::Drivers => EntityKind::Driver,
            KindArg::Processes => EntityKind::Process,
            KindArg::Modules => EntityKind::Module,
            KindArg::Connections => EntityKind::Connection,
            KindArg::Tasks => EntityKind::ScheduledTask,
            KindArg::Programs => EntityKind::InstalledProgram,
            KindArg::Env => EntityKind::EnvironmentVariable,
            KindArg::Windows => EntityKind::Window,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Json,
    Text,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print an inventory as an aligned table (or JSON)
    List {
        kind: KindArg,
        /// Emit JSON instead of the aligned table
        #[arg(long)]
        json: bool,
    },
    /// Print the complete action catalog for a kind
    Actions { kind: KindArg },
    /// Run one action against one target
    Invoke {
        kind: KindArg,
        /// Action identifier as shown by `actions` (e.g. stop, set-startup-auto)
        action: String,
        /// Target entity id as shown by `list` (omitted for export actions)
        target: Option<String>,
        /// Destination path for file-export actions
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export an inventory to a file or stdout
    Export {
        kind: KindArg,
        format: FormatArg,
        /// Destination path; omitted means stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Looks up and refreshes the requested inventory.
fn refreshed_inventory(kind: EntityKind) -> Result<Box<dyn Inventory>, i32> {
    let mut inventory = build_inventories()
        .into_iter()
        .find(|inv| inv.kind() == kind)
        .ok_or(1)?;
    if let Err(e) = inventory.refresh(RefreshMode::Full) {
        eprintln!("error: {e}");
        return Err(EXIT_ENUMERATE);
    }
    Ok(inventory)
}

/// Renders the whole inventory through the export pipeline.
fn render_inventory(inventory: &mut dyn Inventory, verb: Verb) -> Result<String, i32> {
    match inventory.execute(verb, None, None) {
        Ok(ActionOutcome::Clipboard { payload, .. }) => Ok(payload),
        Ok(_) => Ok(String::new()),
        Err(e) => {
            eprintln!("error: {e}");
            Err(e.exit_code())
        }
    }
}

/// Runs one console command and returns the process exit code.
pub fn run(command: Command) -> i32 {
    match command {
        Command::List { kind, json } => {
            let mut inventory = match refreshed_inventory(kind.kind()) {
                Ok(inv) => inv,
                Err(code) => return code,
            };
            let verb = if json { Verb::CopyJson } else { Verb::CopyText };
            match render_inventory(inventory.as_mut(), verb) {
                Ok(payload) => {
                    print!("{payload}");
                    if !payload.ends_with('\n') {
                        println!();
                    }
                    0
                }
                Err(code) => code,
            }
        }

        Command::Actions { kind } => {
            let inventory = match refreshed_inventory(kind.kind()) {
                Ok(inv) => inv,
                Err(code) => return code,
            };
            for action in inventory.all_actions() {
                println!("{:<24} {}", action.slug(), action.description);
            }
            0
        }

        Command::Invoke {
            kind,
            action,
            target,
            out,
        } => {
            let mut inventory = match refreshed_inventory(kind.kind()) {
                Ok(inv) => inv,
                Err(code) => return code,
            };

            let slug = action.to_lowercase();
            let Some(verb) = inventory
                .all_actions()
                .iter()
                .find(|a| a.slug() == slug)
                .map(|a| a.verb)
            else {
                eprintln!("error: unknown action '{action}' for {}", kind.kind().name());
                eprintln!("hint: run `actions {}` for the catalog", kind.kind().name());
                return 1;
            };

            let index = match &target {
                Some(id) => match inventory.index_of_id(id) {
                    Some(i) => Some(i),
                    None => {
                        eprintln!("error: target '{id}' no longer exists");
                        return 4;
                    }
                },
                None => None,
            };

            match inventory.execute(verb, index, out.as_deref()) {
                Ok(ActionOutcome::Clipboard { payload, .. }) => {
                    // The console's clipboard destination is stdout.
                    print!("{payload}");
                    if !payload.ends_with('\n') {
                        println!();
                    }
                    0
                }
                Ok(outcome) => {
                    println!("{}", outcome.summary());
                    0
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    e.exit_code()
                }
            }
        }

        Command::Export { kind, format, out } => {
            let mut inventory = match refreshed_inventory(kind.kind()) {
                Ok(inv) => inv,
                Err(code) => return code,
            };
            let verb = match (format, &out) {
                (FormatArg::Json, Some(_)) => Verb::ExportJsonFile,
                (FormatArg::Text, Some(_)) => Verb::ExportTextFile,
                (FormatArg::Json, None) => Verb::CopyJson,
                (FormatArg::Text, None) => Verb::CopyText,
            };
            match inventory.execute(verb, None, out.as_deref()) {
                Ok(ActionOutcome::Clipboard { payload, .. }) => {
                    print!("{payload}");
                    if !payload.ends_with('\n') {
                        println!();
                    }
                    0
                }
                Ok(outcome) => {
                    println!("{}", outcome.summary());
                    0
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    e.exit_code()
                }
            }
        }
    }
}
