//! Binary entrypoint for the quickswitch daemon.
use std::{path::PathBuf, process};

use clap::{Parser, Subcommand};
use switch_config::resolve_settings_path;
use tracing_subscriber::{fmt, prelude::*};

/// Log-backed overlay presenter.
mod overlay;
/// Settings, permission, tap, and engine wiring.
mod runtime;

#[derive(Parser, Debug)]
#[command(
    name = "quickswitch",
    about = "Keyboard-driven application switcher for macOS",
    version
)]
/// Command-line interface for the `quickswitch` binary.
struct Cli {
    /// Optional subcommand.
    #[command(subcommand)]
    command: Option<Command>,

    /// Optional path to the settings file
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Logging controls
    #[command(flatten)]
    log: logging::LogArgs,
}

#[derive(Subcommand, Debug)]
/// Top-level CLI subcommands.
enum Command {
    /// Load and validate the settings file then exit.
    Check {
        /// Path to the settings file to check (defaults to ~/.quickswitch/settings.ron)
        path: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let spec = cli.log.spec();
    let env_filter = logging::env_filter_from_spec(&spec);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().without_time())
        .try_init()
        .ok();

    if let Some(Command::Check { path }) = &cli.command {
        let explicit = path.as_deref().or(cli.settings.as_deref());
        match resolve_settings_path(explicit) {
            Some(resolved) => match switch_config::Settings::load(&resolved) {
                Ok(settings) => println!(
                    "OK: activation {}, {} binding(s), max visible {}",
                    settings.activation,
                    settings.bindings.len(),
                    settings.max_visible
                ),
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            },
            None => println!("OK: no settings file; defaults in effect"),
        }
        return;
    }

    if let Err(e) = runtime::run(cli.settings.as_deref()) {
        eprintln!("{e}");
        process::exit(1);
    }
}
