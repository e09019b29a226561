//! Inspect and transform action bind files (XML or JSON, picked by extension).
//!
//! Examples:
//!   akeys check ./defaultActionKeys.xml
//!   akeys labels ./defaultActionKeys.xml --override ./actionKeys.xml
//!   akeys merge --defaults ./defaultActionKeys.xml --override ./actionKeys.xml --out ./merged.json
//!   akeys convert ./actionKeys.xml ./actionKeys.json
//!   akeys keys
//!
//! Notes:
//! - Bad entries inside a file are reported as warnings and skipped; only an
//!   unreadable or malformed document fails a command.
//! - `RUST_LOG` overrides the log filter; `--verbose` turns on debug output.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use serde::Serialize;

use actionkeys_core::bindings::bind_tokens::{
    KeyTokenExt, axis_to_token, direction_to_token, mouse_to_token,
};
use actionkeys_core::bindings::save::action_keys_to_xml_string;
use actionkeys_core::prelude::*;

// ───────────────────────────── CLI Args ─────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "akeys", version, about = "Inspect, merge and convert action bind files")]
struct Args {
    /// Engine config JSON (conflict policy, orphan pruning, ...)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a bind file and report what it contains
    Check {
        file: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the UI label of every action
    Labels {
        defaults: PathBuf,
        /// User override laid over the defaults
        #[arg(long = "override", value_name = "PATH")]
        overrides: Option<PathBuf>,
    },
    /// Lay a user override over the defaults and write the merged set
    Merge {
        #[arg(short, long)]
        defaults: PathBuf,
        #[arg(long = "override", value_name = "PATH")]
        overrides: PathBuf,
        /// Output file (XML unless it ends in .json); stdout if missing
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Only write actions that differ from the defaults
        #[arg(long)]
        modified_only: bool,
    },
    /// Rewrite a bind file in the format of the output extension
    Convert { input: PathBuf, output: PathBuf },
    /// Print all valid bind tokens and exit
    Keys,
}

#[derive(Serialize)]
struct CheckSummary {
    actions: usize,
    keyboard_binds: usize,
    controller_binds: usize,
    full_axis_actions: usize,
    unbound: Vec<String>,
}

// ───────────────────────────── main ─────────────────────────────

fn main() -> Result<(), String> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let core_log: Arc<dyn CoreLog> = Arc::new(TracingLog);
    let config = match args.config.as_ref() {
        Some(p) => InputConfig::from_json_file(p).map_err(|e| e.to_string())?,
        None => InputConfig::default(),
    };

    match args.command {
        Command::Check { file, json } => check(&file, json, &core_log),
        Command::Labels { defaults, overrides } => {
            let manager = load_manager(config, &defaults, overrides.as_ref(), &core_log)?;
            for action in manager.get_action_keys() {
                println!("{:<32} {}", action.name, manager.get_action_binds_label(&action.name));
            }
            Ok(())
        }
        Command::Merge {
            defaults,
            overrides,
            out,
            modified_only,
        } => {
            let manager = load_manager(config, &defaults, Some(&overrides), &core_log)?;
            let registry = manager.registry();
            let actions: Vec<&ActionKey> = if modified_only {
                registry.modified_actions().collect()
            } else {
                registry.active().iter().collect()
            };
            match out {
                Some(path) => {
                    let n = save_action_keys(&path, actions, &core_log).map_err(|e| e.to_string())?;
                    core_log.info(&format!("Wrote {n} actions to {}", path.display()));
                }
                None => {
                    print!("{}", action_keys_to_xml_string(actions).map_err(|e| e.to_string())?);
                }
            }
            Ok(())
        }
        Command::Convert { input, output } => {
            let set = load_action_keys(&input, &core_log).map_err(|e| e.to_string())?;
            let n = save_action_keys(&output, &set, &core_log).map_err(|e| e.to_string())?;
            core_log.info(&format!("Converted {n} actions: {} -> {}", input.display(), output.display()));
            Ok(())
        }
        Command::Keys => {
            print_token_lists();
            Ok(())
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

// ───────────────────────────── helpers ─────────────────────────────

fn load_manager(
    config: InputConfig,
    defaults: &Path,
    overrides: Option<&PathBuf>,
    logger: &Arc<dyn CoreLog>,
) -> Result<InputManager, String> {
    let mut manager = InputManager::new(config, Arc::clone(logger));
    manager.load_defaults(defaults).map_err(|e| e.to_string())?;
    if let Some(o) = overrides {
        manager.apply_override_file(o).map_err(|e| e.to_string())?;
    }
    Ok(manager)
}

fn check(file: &Path, json: bool, logger: &Arc<dyn CoreLog>) -> Result<(), String> {
    let set = load_action_keys(file, logger).map_err(|e| e.to_string())?;
    let summary = CheckSummary {
        actions: set.len(),
        keyboard_binds: set.iter().map(|a| a.keyboard_binds().len()).sum(),
        controller_binds: set.iter().map(|a| a.controller_binds().len()).sum(),
        full_axis_actions: set.iter().filter(|a| a.full_axis).count(),
        unbound: set
            .iter()
            .filter(|a| a.all_binds().next().is_none())
            .map(|a| a.name.to_string())
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?);
        return Ok(());
    }
    println!("{}: {} actions", file.display(), summary.actions);
    println!("  keyboard/mouse binds: {}", summary.keyboard_binds);
    println!("  controller binds:     {}", summary.controller_binds);
    println!("  full-axis actions:    {}", summary.full_axis_actions);
    if !summary.unbound.is_empty() {
        println!("  unbound: {}", summary.unbound.join(", "));
    }
    Ok(())
}

fn print_wrapped<'a, I: IntoIterator<Item = &'a str>>(title: &str, tokens: I) {
    println!("{title}");
    let mut line = String::new();
    for t in tokens {
        if !line.is_empty() {
            if line.len() + 1 + t.len() > 80 {
                println!("{line}");
                line.clear();
            } else {
                line.push(' ');
            }
        }
        line.push_str(t);
    }
    if !line.is_empty() {
        println!("{line}");
    }
}

fn print_token_lists() {
    print_wrapped(
        "Valid key tokens:",
        Key::ALL.iter().filter(|k| !k.is_modifier()).map(|k| k.to_token()),
    );
    print_wrapped("Valid modifier tokens:", Key::MODIFIERS.iter().map(|k| k.to_token()));
    print_wrapped("Valid mouse tokens:", MouseButton::ALL.into_iter().map(mouse_to_token));
    println!("Joystick buttons: B0 .. B31");

    let directions = [AxisDirection::Full, AxisDirection::Positive, AxisDirection::Negative]
        .map(direction_to_token)
        .join("|");
    let axes: Vec<String> = JoystickAxis::ALL
        .into_iter()
        .map(|a| format!("{}:{directions}", axis_to_token(a)))
        .collect();
    print_wrapped("Valid axis tokens:", axes.iter().map(String::as_str));
}
