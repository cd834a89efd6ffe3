//! Recipe editor dialog: form fields, description, and the steps table.

use std::iter;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tracing::debug;

use crate::editor::{EditorState, Field, RecipeEditor};
use crate::model::FanSpeed;
use crate::storage::RecipeStore;
use crate::table::{StepRow, TableError};

/// Seconds added or removed by `+` / `-` on a duration cell.
const DURATION_STEP: i64 = 5;

/// Seconds added or removed by `>` / `<` on a duration cell.
const DURATION_JUMP: i64 = 60;

/// Width of the label column in the form.
const LABEL_WIDTH: usize = 17;

/// A row-action control in the Modify column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Up,
    Down,
    Delete,
    Insert,
}

impl RowAction {
    fn label(self) -> &'static str {
        match self {
            Self::Up => "[↑]",
            Self::Down => "[↓]",
            Self::Delete => "[✕]",
            Self::Insert => "[+]",
        }
    }
}

/// A selectable cell position within a table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Temperature,
    Fan,
    Duration,
    Modify(RowAction),
}

/// Cells in left-to-right order.
const COLUMNS: [Column; 7] = [
    Column::Temperature,
    Column::Fan,
    Column::Duration,
    Column::Modify(RowAction::Up),
    Column::Modify(RowAction::Down),
    Column::Modify(RowAction::Delete),
    Column::Modify(RowAction::Insert),
];

/// Which part of the dialog receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Field(Field),
    Steps,
}

/// What the app loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Close,
}

struct Status {
    message: String,
    error: bool,
}

pub struct EditorScreen {
    editor: RecipeEditor,
    focus: Focus,
    row: usize,
    column: Column,
    /// Blocking warning; swallows every key until dismissed.
    alert: Option<String>,
    /// `mm:ss` being typed into the selected duration cell.
    duration_input: Option<String>,
    status: Option<Status>,
}

impl EditorScreen {
    pub fn new(editor: RecipeEditor) -> Self {
        Self {
            editor,
            focus: Focus::Field(Field::Name),
            row: 0,
            column: Column::Temperature,
            alert: None,
            duration_input: None,
            status: None,
        }
    }

    pub fn editor(&self) -> &RecipeEditor {
        &self.editor
    }

    #[cfg(test)]
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyEvent, store: &RecipeStore) -> Outcome {
        if key.kind != KeyEventKind::Press {
            return Outcome::Continue;
        }

        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.alert = None;
            }
            return Outcome::Continue;
        }

        if self.on_duration_input(key) {
            return Outcome::Continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                self.save(store);
                return Outcome::Continue;
            }
            KeyCode::Char('q') if ctrl => return Outcome::Close,
            KeyCode::Esc => return Outcome::Close,
            KeyCode::Tab => {
                self.cycle_focus(true);
                return Outcome::Continue;
            }
            KeyCode::BackTab => {
                self.cycle_focus(false);
                return Outcome::Continue;
            }
            _ => {}
        }

        match self.focus {
            Focus::Field(field) => self.on_field_key(field, key),
            Focus::Steps => self.on_steps_key(key),
        }
        Outcome::Continue
    }

    fn on_field_key(&mut self, field: Field, key: KeyEvent) {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(c) if plain => self.editor.edit_field(field, |s| s.push(c)),
            KeyCode::Backspace => {
                if !self.editor.field(field).is_empty() {
                    self.editor.edit_field(field, |s| {
                        s.pop();
                    });
                }
            }
            KeyCode::Enter if field.is_multiline() => {
                self.editor.edit_field(field, |s| s.push('\n'));
            }
            KeyCode::Enter | KeyCode::Down if !field.is_multiline() => self.cycle_focus(true),
            KeyCode::Up if !field.is_multiline() => self.cycle_focus(false),
            _ => {}
        }
    }

    /// Feeds a key to the duration being typed, if any. Returns whether the
    /// key was consumed; any other key drops the typed text.
    fn on_duration_input(&mut self, key: KeyEvent) -> bool {
        let Some(input) = self.duration_input.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == ':' => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                if let Some(text) = self.duration_input.take() {
                    self.commit_duration(&text);
                }
            }
            KeyCode::Esc => self.duration_input = None,
            _ => {
                self.duration_input = None;
                return false;
            }
        }
        true
    }

    fn commit_duration(&mut self, text: &str) {
        let Some(mut duration) = self.editor.table().rows().get(self.row).map(|r| r.duration)
        else {
            return;
        };
        match duration.set_text(text) {
            Ok(()) => self.edit_row(|r| r.duration = duration),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn on_steps_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() && self.column == Column::Duration => {
                self.duration_input = Some(c.to_string());
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.column == Column::Fan => {
                if let Some(speed) = fan_speed_for(c) {
                    self.edit_row(|r| r.fan.select(speed));
                }
            }
            KeyCode::Up => self.row = self.row.saturating_sub(1),
            KeyCode::Down => {
                if self.row + 1 < self.editor.table().len() {
                    self.row += 1;
                }
            }
            KeyCode::Left => self.shift_column(false),
            KeyCode::Right => self.shift_column(true),
            KeyCode::Char('+' | '=') => self.adjust_cell(true, DURATION_STEP),
            KeyCode::Char('-') => self.adjust_cell(false, DURATION_STEP),
            KeyCode::Char('>') => self.adjust_cell(true, DURATION_JUMP),
            KeyCode::Char('<') => self.adjust_cell(false, DURATION_JUMP),
            KeyCode::Char('c') => self.edit_row(|r| r.temperature.select_cooling()),
            KeyCode::Char('u') => self.run_action(RowAction::Up),
            KeyCode::Char('d') => self.run_action(RowAction::Down),
            KeyCode::Char('x') | KeyCode::Delete => self.run_action(RowAction::Delete),
            KeyCode::Char('i') => self.run_action(RowAction::Insert),
            KeyCode::Enter => {
                if let Column::Modify(action) = self.column {
                    self.run_action(action);
                }
            }
            _ => {}
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order: Vec<Focus> = Field::ALL
            .into_iter()
            .map(Focus::Field)
            .chain(iter::once(Focus::Steps))
            .collect();
        let i = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (i + 1) % order.len()
        } else {
            (i + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn shift_column(&mut self, right: bool) {
        let i = COLUMNS.iter().position(|c| *c == self.column).unwrap_or(0);
        let next = if right {
            (i + 1).min(COLUMNS.len() - 1)
        } else {
            i.saturating_sub(1)
        };
        self.column = COLUMNS[next];
    }

    fn adjust_cell(&mut self, forward: bool, seconds: i64) {
        match self.column {
            Column::Temperature => self.edit_row(|r| {
                if forward {
                    r.temperature.select_next();
                } else {
                    r.temperature.select_previous();
                }
            }),
            Column::Fan => self.edit_row(|r| {
                if forward {
                    r.fan.select_next();
                } else {
                    r.fan.select_previous();
                }
            }),
            Column::Duration => {
                let delta = if forward { seconds } else { -seconds };
                self.edit_row(|r| r.duration.adjust(delta));
            }
            Column::Modify(_) => {}
        }
    }

    fn edit_row(&mut self, edit: impl FnOnce(&mut StepRow)) {
        if let Err(e) = self.editor.edit_row(self.row, edit) {
            self.set_error(e.to_string());
        }
    }

    /// Runs a row action on the selected row; the selection follows the step.
    fn run_action(&mut self, action: RowAction) {
        let row = self.row;
        let last = self.editor.table().len().saturating_sub(1);
        let (result, follow) = match action {
            RowAction::Up => (self.editor.move_step_up(row), row.saturating_sub(1)),
            RowAction::Down => (self.editor.move_step_down(row), (row + 1).min(last)),
            RowAction::Delete => (self.editor.delete_step(row), row),
            RowAction::Insert => (self.editor.insert_step_below(row), row + 1),
        };

        match result {
            Ok(()) => {
                debug!(?action, row, "row action applied");
                self.row = follow.min(self.editor.table().len().saturating_sub(1));
            }
            Err(e @ TableError::LastStep) => self.alert = Some(e.to_string()),
            Err(e) => self.set_error(e.to_string()),
        }
    }

    fn save(&mut self, store: &RecipeStore) {
        match self.editor.save(store) {
            Ok(path) => {
                self.status = Some(Status {
                    message: format!("Saved to {}", path.display()),
                    error: false,
                });
            }
            Err(e) => {
                debug!(error = %e, "save failed");
                self.set_error(format!("Save failed: {e}"));
            }
        }
    }

    fn set_error(&mut self, message: String) {
        self.status = Some(Status {
            message,
            error: true,
        });
    }

    // ── Rendering ──

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(9), // fields
            Constraint::Min(6),    // description + steps
            Constraint::Length(1), // status
            Constraint::Length(1), // help
        ])
        .split(area);

        self.render_title(frame, chunks[0]);
        self.render_fields(frame, chunks[1]);

        let body = Layout::horizontal([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[2]);
        self.render_description(frame, body[0]);
        self.render_steps(frame, body[1]);

        self.render_status(frame, chunks[3]);

        let help = Paragraph::new(Line::from(Span::styled(
            " Tab next  ↑↓←→ move  +/- change  0-9 type  c cooling  u/d/x/i rows  Ctrl+S save  Esc close",
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(help, chunks[4]);

        if let Some(message) = &self.alert {
            render_alert(frame, message);
        }
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let file = self
            .editor
            .file()
            .map_or_else(|| "new recipe".to_string(), |p| p.display().to_string());
        let state = match self.editor.state() {
            EditorState::New => "new",
            EditorState::Loaded => "loaded",
            EditorState::Editing => "edited",
            EditorState::Saved => "saved",
        };
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " Recipe Editor ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(file, Style::default().fg(Color::Gray)),
            Span::styled(format!("  [{state}]"), Style::default().fg(Color::DarkGray)),
        ]));
        frame.render_widget(title, area);
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = Field::ALL
            .into_iter()
            .filter(|f| !f.is_multiline())
            .map(|field| {
                let focused = self.focus == Focus::Field(field);
                let label = format!("{:<LABEL_WIDTH$}", format!("{}:", field.label()));
                let mut spans = vec![
                    Span::styled(label, label_style(focused)),
                    Span::styled(self.editor.field(field).to_string(), value_style(focused)),
                ];
                if focused {
                    spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
                }
                Line::from(spans)
            })
            .collect();

        let block = Block::default().borders(Borders::ALL).title(" Recipe ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_description(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Field(Field::Description);
        let mut text = self.editor.field(Field::Description).to_string();
        if focused {
            text.push('▏');
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(" Description ");
        let paragraph = Paragraph::new(Text::from(text))
            .style(value_style(focused))
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
    }

    fn render_steps(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Steps;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(focused))
            .title(" Steps ");

        let header = Line::from(Span::styled(
            format!(
                "{:<12}{:<11}{:<14}{}",
                "Temperature", "Fan Speed", "Section Time", "Modify"
            ),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::UNDERLINED),
        ));

        // Keep the selected row visible: header plus borders take three lines.
        let visible = usize::from(area.height.saturating_sub(3)).max(1);
        let start = (self.row + 1).saturating_sub(visible);

        let mut lines = vec![header];
        lines.extend(
            self.editor
                .table()
                .rows()
                .iter()
                .enumerate()
                .skip(start)
                .take(visible)
                .map(|(i, row)| self.step_line(i, row, focused)),
        );

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn step_line(&self, i: usize, row: &StepRow, focused: bool) -> Line<'static> {
        let selected_row = i == self.row;
        let base = if selected_row {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cell = |column: Column| {
            if focused && selected_row && self.column == column {
                base.add_modifier(Modifier::REVERSED)
            } else {
                base
            }
        };

        let duration = match &self.duration_input {
            Some(input) if selected_row => format!("{input}▏"),
            _ => row.duration.to_string(),
        };

        let mut spans = vec![
            Span::styled(
                format!("{:<12}", row.temperature.selected().to_string()),
                cell(Column::Temperature),
            ),
            Span::styled(
                format!("{:<11}", row.fan.selected().to_string()),
                cell(Column::Fan),
            ),
            Span::styled(format!("{duration:<14}"), cell(Column::Duration)),
        ];
        for column in &COLUMNS[3..] {
            if let Column::Modify(action) = column {
                spans.push(Span::styled(action.label(), cell(*column)));
                spans.push(Span::raw(" "));
            }
        }
        Line::from(spans)
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let Some(status) = &self.status else {
            return;
        };
        let color = if status.error { Color::Red } else { Color::Green };
        let line = Line::from(Span::styled(
            format!(" {}", status.message),
            Style::default().fg(color),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Fan speed for a digit key; `0` has none.
fn fan_speed_for(c: char) -> Option<FanSpeed> {
    let digit = u8::try_from(c.to_digit(10)?).ok()?;
    FanSpeed::new(digit).ok()
}

fn render_alert(frame: &mut Frame, message: &str) {
    let area = centered_rect(50, 25, frame.area());
    frame.render_widget(Clear, area);

    let text = Text::from(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ]);
    let block = Block::default().borders(Borders::ALL).title(" roastbook ");
    let alert = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));
    frame.render_widget(alert, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1])[1]
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn value_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}
