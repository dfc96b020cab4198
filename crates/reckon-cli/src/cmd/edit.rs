use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::time::Duration;

use reckon_core::config::load_config;

use crate::clipboard::{ClipboardSink, SystemClipboard};
use crate::tui::editor::EditorView;

/// How long to wait for an input event before redrawing. Keeps expired
/// status messages from lingering on screen.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Run the full-screen editor until the user quits.
pub fn run_edit(project_root: &Path) -> Result<()> {
    let config = load_config(project_root)?;
    let mut view = EditorView::new(config.document.options());
    let mut clipboard = SystemClipboard;

    enable_raw_mode().context("failed to enable raw terminal mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut view, &mut clipboard);

    // Restore the terminal even when the loop failed.
    disable_raw_mode().context("failed to disable raw terminal mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view: &mut EditorView,
    clipboard: &mut dyn ClipboardSink,
) -> Result<()> {
    loop {
        terminal.draw(|frame| view.draw(frame))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    view.handle_key(key, clipboard)?;
                }
            }
        }

        if view.should_quit() {
            return Ok(());
        }
    }
}
