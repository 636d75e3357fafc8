//! Modsync CLI - generate, move and inspect route-linked feature modules

use anyhow::Result;
use clap::{Parser, Subcommand};
use modsync_core::tui::{GenerateArgs, MoveArgs};
use modsync_core::ProductConfig;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Modsync product configuration
#[derive(Clone)]
pub struct ModsyncConfig;

impl ProductConfig for ModsyncConfig {
    fn name(&self) -> &'static str {
        "modsync"
    }

    fn display_name(&self) -> &'static str {
        "Modsync"
    }

    fn cli_description(&self) -> &'static str {
        "Generate, move and inspect route-linked feature modules"
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install modsync --force"
    }
}

#[derive(Parser, Debug)]
#[command(name = "modsync")]
#[command(about = "Generate, move and inspect route-linked feature modules")]
#[command(version)]
pub struct Args {
    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a module and wire it into its parent
    Generate(CliGenerateArgs),
    /// Move or rename a module and repair its references
    Move(CliMoveArgs),
    /// Print the route tree reconstructed from route files
    Visualize,
}

#[derive(Parser, Debug)]
pub struct CliGenerateArgs {
    /// Module path, e.g. reports/monthly (prompted when omitted)
    pub path: Option<String>,

    /// Artifact kinds or preset names (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub kinds: Option<Vec<String>>,

    /// Preset from the project config
    #[arg(short, long, conflicts_with = "kinds")]
    pub preset: Option<String>,

    /// Generate a nested module with its own standalone routes
    #[arg(long)]
    pub standalone: bool,

    /// Overwrite existing artifacts
    #[arg(long)]
    pub overwrite: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliGenerateArgs> for GenerateArgs {
    fn from(args: CliGenerateArgs) -> Self {
        GenerateArgs {
            path: args.path,
            kinds: args.kinds,
            preset: args.preset,
            standalone: args.standalone,
            overwrite: args.overwrite,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct CliMoveArgs {
    /// Module to move
    pub source: String,

    /// Destination module path (promote to root when omitted)
    pub target: Option<String>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliMoveArgs> for MoveArgs {
    fn from(args: CliMoveArgs) -> Self {
        MoveArgs {
            source: args.source,
            target: args.target,
            yes: args.yes,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Prompts own stdout
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let config = ModsyncConfig;
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    let result = match args.command {
        Command::Generate(generate_args) => {
            modsync_core::run_generate(&config, &root, generate_args.into(), CLI_VERSION).await
        }
        Command::Move(move_args) => {
            modsync_core::run_move(&config, &root, move_args.into(), CLI_VERSION).await
        }
        Command::Visualize => modsync_core::run_visualize(&config, &root, CLI_VERSION).await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    modsync_core::tui::finish_cancelled(result)
}
