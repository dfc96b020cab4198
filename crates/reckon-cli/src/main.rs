#![forbid(unsafe_code)]

mod clipboard;
mod cmd;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use std::{env, io};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "reckon: nested task estimation editor with Markdown export",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Open the full-screen editor",
        long_about = "Open the full-screen estimation list editor. This is the default when no subcommand is given.",
        after_help = "EXAMPLES:\n    # Open the editor\n    rk\n\n    # Same, explicitly\n    rk edit"
    )]
    Edit,

    #[command(
        about = "Render a JSON task list to Markdown",
        long_about = "Read a task list as a JSON array of tasks, recompute derived estimations, and print the Markdown export document.",
        after_help = "EXAMPLES:\n    # Render from a file\n    rk render tasks.json\n\n    # Render from stdin and copy to the clipboard\n    cat tasks.json | rk render --copy\n\n    # Emit the recomputed list as JSON\n    rk render tasks.json --json"
    )]
    Render(cmd::render::RenderArgs),

    #[command(
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    rk completions bash\n\n    # Generate zsh completions\n    rk completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Set up the tracing subscriber before any command runs.
///
/// `RECKON_LOG` takes standard `EnvFilter` directives; without it the
/// filter defaults to info-level (debug when `DEBUG` is set). Everything
/// goes to stderr so `rk render` output stays pipeable. Setting
/// `RECKON_LOG_FORMAT=json` switches the compact human format to
/// line-delimited JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("RECKON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "reckon=debug,info"
        } else {
            "reckon=info,warn"
        })
    });

    let registry = tracing_subscriber::registry().with(filter);
    let json = env::var("RECKON_LOG_FORMAT").is_ok_and(|fmt| fmt == "json");
    if json {
        registry
            .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;

    match cli.command {
        None | Some(Commands::Edit) => cmd::edit::run_edit(&project_root),
        Some(Commands::Render(ref args)) => cmd::render::run_render(args, &project_root),
        Some(Commands::Completions(args)) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
