use anyhow::{Context, Result};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use reckon_core::config::load_config;
use reckon_core::model::{Task, TaskList};
use reckon_core::render::document;

use crate::clipboard::{ClipboardSink, SystemClipboard};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// JSON task list to render (defaults to stdin).
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Write the document to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Emit the recomputed task list as JSON instead of Markdown.
    #[arg(long)]
    pub json: bool,

    /// Also copy the rendered document to the system clipboard.
    #[arg(long)]
    pub copy: bool,
}

pub fn run_render(args: &RenderArgs, project_root: &Path) -> Result<()> {
    let input = match args.file.as_ref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read task list from stdin")?;
            buf
        }
    };

    // Accept a bare JSON array of tasks; derived estimations are recomputed
    // on load, so stale input values never leak into the document.
    let tasks: Vec<Task> = serde_json::from_str(&input).context("failed to parse task list JSON")?;
    let list = TaskList::from_tasks(tasks);

    let config = load_config(project_root)?;
    let rendered = document(&list, &config.document.options());

    let mut out: Box<dyn Write> = match args.output.as_ref() {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&list)?)?;
    } else {
        writeln!(out, "{rendered}")?;
    }
    out.flush()?;

    if args.copy {
        SystemClipboard
            .copy(&rendered)
            .context("document rendered, but the clipboard write failed")?;
        eprintln!("Copied Markdown to clipboard");
    }

    Ok(())
}
