//! Ratatui-based terminal UI.
//!
//! The TUI presents the nine-field customer form in two columns, scores the
//! record on submit, and renders the decision banner, probabilities, a
//! confidence gauge and the priority interpretation.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

use crate::app::pipeline::{self, Scored, Session};
use crate::error::AppError;
use crate::report::PriorityTier;

mod form;

pub use form::{Form, FormField};

/// Start the TUI.
pub fn run(session: Session) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(5, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(session);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(5, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(5, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// A failed submit, kept for display until the next one.
struct Failure {
    message: String,
    hint: &'static str,
}

struct App {
    session: Session,
    form: Form,
    scored: Option<Scored>,
    failure: Option<Failure>,
    show_info: bool,
    status: String,
}

impl App {
    fn new(session: Session) -> Self {
        let status = if session.gateway.is_ready() {
            format!("Model loaded: {}", session.model_name())
        } else {
            "Model unavailable. Prediction is disabled.".to_string()
        };
        Self {
            form: Form::new(session.bounds),
            session,
            scored: None,
            failure: None,
            show_info: false,
            status,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(5, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(5, format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::new(5, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns true when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.form.is_editing() {
            self.handle_edit(code);
            return false;
        }

        // Without a model the form is read-only.
        let ready = self.session.gateway.is_ready();
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up | KeyCode::BackTab => self.form.select_prev(),
            KeyCode::Down | KeyCode::Tab => self.form.select_next(),
            KeyCode::Left if ready => self.form.adjust(-1),
            KeyCode::Right if ready => self.form.adjust(1),
            KeyCode::Enter => match self.form.selected() {
                FormField::Submit => self.submit(),
                _ if !ready => {}
                field if field.is_numeric() => {
                    self.form.begin_edit();
                    self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label());
                }
                _ => self.form.adjust(1),
            },
            KeyCode::Char('p') => self.submit(),
            KeyCode::Char('i') => self.show_info = !self.show_info,
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('r') => {
                self.form.reset();
                self.scored = None;
                self.failure = None;
                self.status = "Form reset to defaults.".to_string();
            }
            KeyCode::Esc => self.show_info = false,
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.form.cancel_edit();
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => match self.form.commit_edit() {
                Ok(()) => self.status = format!("{} set.", self.form.selected().label()),
                Err(msg) => self.status = msg,
            },
            KeyCode::Backspace => self.form.edit_backspace(),
            KeyCode::Char(c) => self.form.edit_push(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if !self.session.gateway.is_ready() {
            self.status = "Prediction is disabled: the model failed to load.".to_string();
            return;
        }

        match pipeline::score_fields(&self.session, self.form.fields.clone()) {
            Ok(scored) => {
                self.status = format!(
                    "Predicted: {} ({:.1}%)",
                    scored.outcome.banner.text(),
                    scored.outcome.p_yes_pct
                );
                self.scored = Some(scored);
                self.failure = None;
            }
            Err(err) => {
                self.status = "Prediction failed.".to_string();
                self.failure = Some(Failure {
                    message: err.to_string(),
                    hint: err.hint(),
                });
                self.scored = None;
            }
        }
    }

    fn export(&mut self) {
        let Some(scored) = &self.scored else {
            self.status = "Nothing to export yet. Run a prediction first.".to_string();
            return;
        };
        let now = chrono::Local::now();
        let path = crate::io::timestamped_export_path(Path::new("."), now);
        let file = scored.export_file(self.session.model_name(), now);
        match crate::io::write_outcome_json(&path, &file) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "exported result");
                self.status = format!("Exported result: {}", path.display());
            }
            Err(err) => self.status = format!("Export failed: {err}"),
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(4)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if self.show_info {
            self.draw_info(frame, size);
        }
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("deposit", Style::default().fg(Color::Cyan)),
            Span::raw(" | term deposit prediction"),
        ]));

        let model_line = match self.session.gateway.model() {
            Ok(model) => format!(
                "model: {} | kind: {} | file: {}",
                model.name(),
                model.kind_name(),
                self.session.gateway.path().display()
            ),
            Err(_) => format!("model: unavailable | file: {}", self.session.gateway.path().display()),
        };
        lines.push(Line::from(Span::styled(model_line, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        self.draw_form(frame, columns[0]);
        self.draw_results(frame, columns[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FormField::DEMOGRAPHICS.len() as u16 + 2),
                Constraint::Length(FormField::CAMPAIGN.len() as u16 + 2),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_section(frame, rows[0], "Demographics", &FormField::DEMOGRAPHICS);
        self.draw_section(frame, rows[1], "Campaign", &FormField::CAMPAIGN);

        let enabled = self.session.gateway.is_ready();
        let selected = self.form.selected() == FormField::Submit;
        let (text, style) = if enabled {
            let style = if selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            };
            ("[ Predict deposit likelihood ]", style)
        } else {
            ("[ Predict ] (disabled)", Style::default().fg(Color::DarkGray))
        };
        let button = Paragraph::new(Span::styled(text, style))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(button, rows[2]);
    }

    fn draw_section(&self, frame: &mut ratatui::Frame<'_>, area: Rect, title: &str, fields: &[FormField]) {
        let enabled = self.session.gateway.is_ready();
        let mut lines = Vec::with_capacity(fields.len());
        for &field in fields {
            let selected = self.form.selected() == field;
            let value = match (selected, self.form.edit_buffer()) {
                (true, Some(buf)) => format!("{buf}_"),
                _ => self.form.display_value(field),
            };
            let marker = if selected { "» " } else { "  " };
            let style = if !enabled {
                Style::default().fg(Color::DarkGray)
            } else if selected {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };
            let arrows = if selected && !self.form.is_editing() { " ◂▸" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("{marker}{:<20} {value}{arrows}", field.label()),
                style,
            )));
        }
        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Prediction").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(err) = self.session.gateway.load_error() {
            let text = Text::from(vec![
                Line::from(Span::styled(
                    "Model unavailable",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(err.to_string()),
                Line::from(""),
                Line::from(Span::styled(
                    "The form is shown read-only; fix the model file and restart.",
                    Style::default().fg(Color::Gray),
                )),
            ]);
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
            return;
        }

        if let Some(failure) = &self.failure {
            let text = Text::from(vec![
                Line::from(Span::styled(
                    failure.message.clone(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(failure.hint, Style::default().fg(Color::Yellow))),
            ]);
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
            return;
        }

        let Some(scored) = &self.scored else {
            let msg = Paragraph::new("Fill in the form and press Enter on Predict (or 'p').")
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(0),
            ])
            .split(inner);

        let outcome = &scored.outcome;
        let (mark, color) = if outcome.banner.is_positive() {
            ("✔", Color::Green)
        } else {
            ("✘", Color::Red)
        };
        let banner = Paragraph::new(Span::styled(
            format!("{mark} {}", outcome.banner.text()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(banner, rows[0]);

        let metrics = Text::from(vec![
            Line::from(format!("Probability NO : {:.1}%", outcome.p_no_pct)),
            Line::from(format!("Probability YES: {:.1}%", outcome.p_yes_pct)),
        ]);
        frame.render_widget(Paragraph::new(metrics), rows[1]);

        let gauge = Gauge::default()
            .block(Block::default().title("Confidence").borders(Borders::ALL))
            .gauge_style(Style::default().fg(color))
            .ratio(outcome.progress)
            .label(format!("Likelihood of opening a deposit: {:.1}%", outcome.p_yes_pct));
        frame.render_widget(gauge, rows[2]);

        let tier_color = tier_color(outcome.tier);
        let interpretation = Text::from(vec![
            Line::from(Span::styled(
                outcome.tier.title(),
                Style::default().fg(tier_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(outcome.tier.interpretation()),
        ]);
        let p = Paragraph::new(interpretation)
            .block(Block::default().title("Interpretation").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(p, rows[3]);
    }

    fn draw_info(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let text = match self.session.gateway.model() {
            Ok(model) => crate::report::format_model_info(model),
            Err(err) => format!("Model unavailable.\n\n{err}"),
        };
        let rect = centered(area, 70, 70);
        frame.render_widget(Clear, rect);
        let p = Paragraph::new(text)
            .block(Block::default().title("Model information (i/Esc to close)").borders(Borders::ALL))
            .wrap(Wrap { trim: false });
        frame.render_widget(p, rect);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit/predict  p predict  i info  e export  r reset  q quit";
        let lines = vec![
            Line::from(Span::styled(self.form.help(), Style::default().fg(Color::Cyan))),
            Line::from(vec![
                Span::styled(help, Style::default().fg(Color::Gray)),
                Span::raw(" | "),
                Span::styled(&self.status, Style::default().fg(Color::Yellow)),
            ]),
        ];
        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn tier_color(tier: PriorityTier) -> Color {
    match tier {
        PriorityTier::High => Color::Cyan,
        PriorityTier::Medium => Color::Yellow,
        PriorityTier::Low => Color::Red,
    }
}

/// A rectangle of `pct_x`% × `pct_y`% centered in `area`.
fn centered(area: Rect, pct_x: u16, pct_y: u16) -> Rect {
    let scale = |len: u16, pct: u16| (u32::from(len) * u32::from(pct.min(100)) / 100) as u16;
    let width = scale(area.width, pct_x);
    let height = scale(area.height, pct_y);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
