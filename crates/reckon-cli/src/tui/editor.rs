//! Full-screen estimation list editor.
//!
//! A flattened task/subtask table with modal editing:
//! - `j/k` navigate, `a` add task, `A` add subtask, `x` delete
//! - `i`/Enter edit description, `e` edit estimate fields
//! - `y` export Markdown to the clipboard, `?` help, `q` quit
//!
//! Every key event runs to completion before the next is read; the task
//! list is never observable in a partially-mutated state.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState},
};
use std::time::{Duration, Instant};

use reckon_core::model::{Estimate, TaskList};
use reckon_core::render::{DocumentOptions, document, grand_total};

use crate::clipboard::ClipboardSink;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Longest digit run accepted in an estimate field; keeps every buffer
/// parseable as `u32`.
const MAX_FIELD_DIGITS: usize = 9;

// ---------------------------------------------------------------------------
// Row model
// ---------------------------------------------------------------------------

/// One row of the flattened task/subtask table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRef {
    Task(usize),
    Sub(usize, usize),
}

impl RowRef {
    /// Index of the task this row belongs to.
    const fn task_index(self) -> usize {
        match self {
            Self::Task(task) | Self::Sub(task, _) => task,
        }
    }
}

// ---------------------------------------------------------------------------
// Input modes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum InputMode {
    #[default]
    Normal,
    /// Single-line description edit for the selected row.
    EditDescription,
    /// Three-field d/h/m estimate edit for the selected row.
    EditEstimate,
    /// Help overlay is open.
    Help,
}

/// Focused field inside the estimate editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum EstField {
    #[default]
    Days,
    Hours,
    Minutes,
}

impl EstField {
    const fn next(self) -> Self {
        match self {
            Self::Days => Self::Hours,
            Self::Hours => Self::Minutes,
            Self::Minutes => Self::Days,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Days => Self::Minutes,
            Self::Hours => Self::Days,
            Self::Minutes => Self::Hours,
        }
    }

    const fn idx(self) -> usize {
        match self {
            Self::Days => 0,
            Self::Hours => 1,
            Self::Minutes => 2,
        }
    }

    const fn unit(self) -> char {
        match self {
            Self::Days => 'd',
            Self::Hours => 'h',
            Self::Minutes => 'm',
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor helpers for single-line editing
// ---------------------------------------------------------------------------

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map_or(value.len(), |(idx, _)| idx)
}

fn insert_char_at(value: &mut String, char_idx: usize, ch: char) {
    let idx = byte_index_at_char(value, char_idx);
    value.insert(idx, ch);
}

fn remove_char_at(value: &mut String, char_idx: usize) {
    if char_idx >= char_len(value) {
        return;
    }
    let start = byte_index_at_char(value, char_idx);
    let end = byte_index_at_char(value, char_idx + 1);
    value.replace_range(start..end, "");
}

fn with_cursor(value: &str, char_idx: usize) -> String {
    let mut out = String::new();
    let mut inserted = false;
    for (idx, ch) in value.chars().enumerate() {
        if idx == char_idx {
            out.push('█');
            inserted = true;
        }
        out.push(ch);
    }
    if !inserted {
        out.push('█');
    }
    out
}

// ---------------------------------------------------------------------------
// Editor state
// ---------------------------------------------------------------------------

/// Main application state for the editor.
pub struct EditorView {
    /// The list under edit. All mutation goes through its methods.
    list: TaskList,
    /// Headings for the exported document.
    options: DocumentOptions,
    /// Selected row index into the flattened row sequence.
    selected: usize,
    /// Current input mode.
    input_mode: InputMode,
    /// Buffer for the description being edited.
    desc_buf: String,
    /// Char-indexed cursor into `desc_buf`.
    desc_cursor: usize,
    /// Digit buffers for days/hours/minutes while editing an estimate.
    est_bufs: [String; 3],
    /// Focused field inside the estimate editor.
    est_field: EstField,
    /// Transient status line with its creation time.
    status_msg: Option<(String, Instant)>,
    /// Whether to quit.
    should_quit: bool,
}

impl EditorView {
    #[must_use]
    pub fn new(options: DocumentOptions) -> Self {
        Self {
            list: TaskList::new(),
            options,
            selected: 0,
            input_mode: InputMode::default(),
            desc_buf: String::new(),
            desc_cursor: 0,
            est_bufs: [String::new(), String::new(), String::new()],
            est_field: EstField::default(),
            status_msg: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub const fn list(&self) -> &TaskList {
        &self.list
    }

    /// The flattened row sequence. Never empty, since the list always holds
    /// at least one task.
    fn rows(&self) -> Vec<RowRef> {
        let mut rows = Vec::new();
        for (task_idx, task) in self.list.tasks().iter().enumerate() {
            rows.push(RowRef::Task(task_idx));
            for sub_idx in 0..task.sub_tasks.len() {
                rows.push(RowRef::Sub(task_idx, sub_idx));
            }
        }
        rows
    }

    fn selected_row(&self) -> RowRef {
        let rows = self.rows();
        rows[self.selected.min(rows.len() - 1)]
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn select_row(&mut self, row: RowRef) {
        if let Some(idx) = self.rows().iter().position(|r| *r == row) {
            self.selected = idx;
        }
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status_msg = Some((msg.into(), Instant::now()));
    }

    /// Current status message, if it has not expired.
    fn status(&self) -> Option<&str> {
        self.status_msg
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TTL)
            .map(|(msg, _)| msg.as_str())
    }

    // -----------------------------------------------------------------------
    // Key event handling
    // -----------------------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent, clipboard: &mut dyn ClipboardSink) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_key(key, clipboard),
            InputMode::EditDescription => self.handle_description_key(key),
            InputMode::EditEstimate => self.handle_estimate_key(key),
            InputMode::Help => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q' | '?')) {
                    self.input_mode = InputMode::Normal;
                }
            }
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, key: KeyEvent, clipboard: &mut dyn ClipboardSink) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.rows().len();
                if self.selected + 1 < len {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = self.rows().len() - 1,

            KeyCode::Char('a') => self.add_task(),
            KeyCode::Char('A') => self.add_sub_task(),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_selected(),

            KeyCode::Char('i') | KeyCode::Enter => self.begin_edit_description(),
            KeyCode::Char('e') => self.begin_edit_estimate(),

            KeyCode::Char('y') => self.export(clipboard),

            KeyCode::Char('?') => self.input_mode = InputMode::Help,

            _ => {}
        }
    }

    fn add_task(&mut self) {
        let index = self.list.add_task();
        self.select_row(RowRef::Task(index));
        self.begin_edit_description();
    }

    fn add_sub_task(&mut self) {
        let task = self.selected_row().task_index();
        match self.list.add_sub_task(task) {
            Ok(sub) => {
                self.select_row(RowRef::Sub(task, sub));
                self.begin_edit_description();
            }
            Err(err) => self.set_status(err.to_string()),
        }
    }

    fn delete_selected(&mut self) {
        let result = match self.selected_row() {
            RowRef::Task(task) => self.list.remove_task(task),
            RowRef::Sub(task, sub) => self.list.remove_sub_task(task, sub),
        };
        if let Err(err) = result {
            self.set_status(err.to_string());
        }
        self.clamp_selection();
    }

    // -----------------------------------------------------------------------
    // Description editing
    // -----------------------------------------------------------------------

    fn begin_edit_description(&mut self) {
        let current = match self.selected_row() {
            RowRef::Task(task) => self.list.tasks()[task].description.clone(),
            RowRef::Sub(task, sub) => self.list.tasks()[task].sub_tasks[sub].description.clone(),
        };
        self.desc_cursor = char_len(&current);
        self.desc_buf = current;
        self.input_mode = InputMode::EditDescription;
    }

    fn handle_description_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.commit_description();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Left => self.desc_cursor = self.desc_cursor.saturating_sub(1),
            KeyCode::Right => {
                self.desc_cursor = (self.desc_cursor + 1).min(char_len(&self.desc_buf));
            }
            KeyCode::Home => self.desc_cursor = 0,
            KeyCode::End => self.desc_cursor = char_len(&self.desc_buf),
            KeyCode::Backspace => {
                if self.desc_cursor > 0 {
                    let remove_idx = self.desc_cursor - 1;
                    remove_char_at(&mut self.desc_buf, remove_idx);
                    self.desc_cursor = remove_idx;
                }
            }
            KeyCode::Delete => remove_char_at(&mut self.desc_buf, self.desc_cursor),
            KeyCode::Char(c) => {
                insert_char_at(&mut self.desc_buf, self.desc_cursor, c);
                self.desc_cursor += 1;
            }
            _ => {}
        }
    }

    fn commit_description(&mut self) {
        let text = std::mem::take(&mut self.desc_buf);
        let result = match self.selected_row() {
            RowRef::Task(task) => self.list.set_task_description(task, text),
            RowRef::Sub(task, sub) => self.list.set_sub_task_description(task, sub, text),
        };
        if let Err(err) = result {
            self.set_status(err.to_string());
        }
    }

    // -----------------------------------------------------------------------
    // Estimate editing
    // -----------------------------------------------------------------------

    fn begin_edit_estimate(&mut self) {
        let estimation = match self.selected_row() {
            RowRef::Task(task) => {
                if self.list.tasks()[task].estimation_is_derived() {
                    self.set_status("Estimate is derived from subtasks; edit those instead");
                    return;
                }
                self.list.tasks()[task].estimation
            }
            RowRef::Sub(task, sub) => self.list.tasks()[task].sub_tasks[sub].estimation,
        };
        self.est_bufs = [
            estimation.days.to_string(),
            estimation.hours.to_string(),
            estimation.minutes.to_string(),
        ];
        self.est_field = EstField::default();
        self.input_mode = InputMode::EditEstimate;
    }

    fn handle_estimate_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.commit_estimate();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Tab | KeyCode::Right => self.est_field = self.est_field.next(),
            KeyCode::BackTab | KeyCode::Left => self.est_field = self.est_field.prev(),
            KeyCode::Backspace => {
                self.est_bufs[self.est_field.idx()].pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                let buf = &mut self.est_bufs[self.est_field.idx()];
                if buf.len() < MAX_FIELD_DIGITS {
                    buf.push(c);
                }
            }
            // Non-numeric input is ignored; an empty field commits as 0.
            _ => {}
        }
    }

    /// Parse one digit buffer. Empty or malformed input coerces to 0 at
    /// this boundary; it is never an error.
    fn parse_field(buf: &str) -> u32 {
        buf.parse().unwrap_or(0)
    }

    fn commit_estimate(&mut self) {
        let estimation = Estimate::new(
            Self::parse_field(&self.est_bufs[0]),
            Self::parse_field(&self.est_bufs[1]),
            Self::parse_field(&self.est_bufs[2]),
        );
        let result = match self.selected_row() {
            RowRef::Task(task) => self.list.set_task_estimation(task, estimation),
            RowRef::Sub(task, sub) => self.list.set_sub_task_estimation(task, sub, estimation),
        };
        if let Err(err) = result {
            self.set_status(err.to_string());
        }
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Build the export document and deliver it to the clipboard sink.
    ///
    /// The document string is unaffected by delivery failure; the list is
    /// never mutated here.
    fn export(&mut self, clipboard: &mut dyn ClipboardSink) {
        let rendered = document(&self.list, &self.options);
        match clipboard.copy(&rendered) {
            Ok(()) => self.set_status("Copied Markdown to clipboard"),
            Err(err) => {
                tracing::warn!("clipboard write failed: {err:#}");
                self.set_status(format!("Clipboard copy failed: {err}"));
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    pub fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(2)])
            .split(frame.area());

        self.draw_table(frame, chunks[0]);
        self.draw_footer(frame, chunks[1]);

        match self.input_mode {
            InputMode::EditDescription => self.draw_description_modal(frame),
            InputMode::EditEstimate => self.draw_estimate_modal(frame),
            InputMode::Help => Self::draw_help_overlay(frame),
            InputMode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let rows: Vec<Row> = self
            .rows()
            .iter()
            .map(|row| match *row {
                RowRef::Task(task) => {
                    let task = &self.list.tasks()[task];
                    let token_style = if task.estimation_is_derived() {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default().fg(Color::Green)
                    };
                    Row::new(vec![
                        Cell::from(task.estimation.to_string()).style(token_style),
                        Cell::from(task.description.clone()),
                    ])
                }
                RowRef::Sub(task, sub) => {
                    let sub = &self.list.tasks()[task].sub_tasks[sub];
                    Row::new(vec![
                        Cell::from(format!("  {}", sub.estimation))
                            .style(Style::default().fg(Color::Green)),
                        Cell::from(format!("    {}", sub.description))
                            .style(Style::default().fg(Color::Gray)),
                    ])
                }
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(10)])
            .header(
                Row::new(vec!["estimate", "description"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title(" reckon "));

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let total = grand_total(self.list());
        let total_line = Line::from(vec![
            Span::styled("total ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("`{total}`"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);

        let hint_line = self.status().map_or_else(
            || {
                Line::from(Span::styled(
                    "j/k move  a task  A subtask  x delete  i describe  e estimate  y export  ? help  q quit",
                    Style::default().fg(Color::DarkGray),
                ))
            },
            |msg| Line::from(Span::styled(msg.to_string(), Style::default().fg(Color::Yellow))),
        );

        frame.render_widget(Paragraph::new(vec![total_line, hint_line]), area);
    }

    fn draw_description_modal(&self, frame: &mut Frame) {
        let area = centered_rect(frame.area(), 60, 3);
        let text = with_cursor(&self.desc_buf, self.desc_cursor);
        let widget = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" description (Enter save, Esc cancel) "),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(widget, area);
    }

    fn draw_estimate_modal(&self, frame: &mut Frame) {
        let area = centered_rect(frame.area(), 40, 3);
        let mut spans = Vec::new();
        for field in [EstField::Days, EstField::Hours, EstField::Minutes] {
            let buf = &self.est_bufs[field.idx()];
            let style = if field == self.est_field {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(
                format!("[{:>3}]{} ", buf, field.unit()),
                style,
            ));
        }
        let widget = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" estimate (Tab next field, Enter save, Esc cancel) "),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(widget, area);
    }

    fn draw_help_overlay(frame: &mut Frame) {
        let area = centered_rect(frame.area(), 56, 14);
        let lines = [
            ("j / k", "move selection"),
            ("a", "add a task"),
            ("A", "add a subtask under the selected task"),
            ("x / Del", "delete the selected row"),
            ("i / Enter", "edit description"),
            ("e", "edit estimate (locked while subtasks exist)"),
            ("y", "copy Markdown export to clipboard"),
            ("g / G", "jump to first / last row"),
            ("q", "quit"),
        ];
        let text: Vec<Line> = lines
            .iter()
            .map(|(keys, what)| {
                Line::from(vec![
                    Span::styled(
                        format!("{keys:<10}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*what),
                ])
            })
            .collect();
        let widget = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" keys (Esc close) "),
        );
        frame.render_widget(Clear, area);
        frame.render_widget(widget, area);
    }
}

/// A rectangle of `width` x `height` centered in `area`, clamped to fit.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
