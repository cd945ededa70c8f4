//! UI layer: event loop, key/mouse dispatch, and rendering coordination.

pub mod app;
pub mod panes;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::warn;

use crate::actions::connection::{ConnectionEvent, ConnectionLink};
use crate::data::effect::Effect;
use crate::data::state::{SessionState, StatusLabel};
use crate::error::Result;
use crate::queries::output::max_scroll_back;
use crate::queries::prompt::status_text;
use crate::transforms::{input, session};

const WHEEL_ROWS: usize = 3;

fn main_loop(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    state: &mut SessionState,
    link: &mut ConnectionLink,
) -> Result<()> {
    let effects = session::begin_connect(state);
    apply_effects(state, link, effects);

    while !state.should_quit {
        for conn_event in link.poll_events() {
            handle_connection_event(state, conn_event);
        }

        let effects = session::run_due_tasks(state, Instant::now());
        apply_effects(state, link, effects);

        terminal.draw(|frame| draw(frame, state))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        let effects = handle_key(state, key.code, key.modifiers);
                        apply_effects(state, link, effects);
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => input::scroll_up(state, WHEEL_ROWS),
                    MouseEventKind::ScrollDown => input::scroll_down(state, WHEEL_ROWS),
                    _ => {}
                },
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_connection_event(state: &mut SessionState, conn_event: ConnectionEvent) {
    let now = Instant::now();
    match conn_event {
        ConnectionEvent::Opened => session::handle_opened(state),
        ConnectionEvent::Message(text) => session::handle_message(state, &text, now),
        ConnectionEvent::Error(e) => session::handle_error(state, &e),
        ConnectionEvent::Closed => session::handle_closed(state, now),
    }
}

/// Execute effects returned by transforms.
fn apply_effects(state: &mut SessionState, link: &mut ConnectionLink, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Connect => link.open(),
            Effect::Send(message) => match message.to_json() {
                Ok(json) => {
                    link.send(json);
                }
                Err(e) => warn!(error = %e, "could not encode command"),
            },
            Effect::CloseConnection => link.close(),
            Effect::Quit => state.should_quit = true,
        }
    }
}

fn handle_key(state: &mut SessionState, key: KeyCode, modifiers: KeyModifiers) -> Vec<Effect> {
    // Handle reconnect confirmation dialog
    if state.confirm_reconnect {
        return match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                session::confirm_reconnect(state)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                session::decline_reconnect(state);
                Vec::new()
            }
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
                session::request_quit(state)
            }
            _ => Vec::new(),
        };
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('l') => input::clear_screen(state),
            KeyCode::Char('c') => input::cancel_input(state),
            KeyCode::Char('d') => return session::request_quit(state),
            _ => {}
        }
        return Vec::new();
    }

    let page = state.output_visible_height.max(1);
    match key {
        KeyCode::Enter => return input::submit_input(state),
        KeyCode::Up => input::recall_previous(state),
        KeyCode::Down => input::recall_next(state),
        KeyCode::Left => input::move_cursor_left(state),
        KeyCode::Right => input::move_cursor_right(state),
        KeyCode::Home => input::move_cursor_home(state),
        KeyCode::End => input::move_cursor_end(state),
        KeyCode::Backspace => input::delete_before_cursor(state),
        KeyCode::Delete => input::delete_at_cursor(state),
        KeyCode::PageUp => input::scroll_up(state, page),
        KeyCode::PageDown => input::scroll_down(state, page),
        KeyCode::Char(c) => input::insert_char(state, c),
        _ => {}
    }
    Vec::new()
}

fn draw(frame: &mut Frame, state: &mut SessionState) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    state.output_visible_height = chunks[0].height.saturating_sub(2) as usize;
    state.output_visible_width = chunks[0].width.saturating_sub(2) as usize;
    // A resize can shrink how far back the pane reaches.
    let max_back = max_scroll_back(
        &state.output,
        state.output_visible_width,
        state.output_visible_height,
    );
    state.output.scroll_back = state.output.scroll_back.min(max_back);

    panes::output::draw(frame, state, chunks[0]);
    panes::prompt::draw(frame, state, chunks[1]);
    draw_status_bar(frame, state, chunks[2]);

    if state.confirm_reconnect {
        draw_reconnect_dialog(frame, state, size);
    }
}

fn draw_reconnect_dialog(frame: &mut Frame, state: &SessionState, area: Rect) {
    let theme = state.theme();
    let dialog_width = 40;
    let dialog_height = 5;
    let x = area.width.saturating_sub(dialog_width) / 2;
    let y = area.height.saturating_sub(dialog_height) / 2;
    let dialog_area = Rect::new(x, y, dialog_width.min(area.width), dialog_height.min(area.height));

    frame.render_widget(Clear, dialog_area);

    let text = vec![
        Line::from(""),
        Line::from("Connection lost."),
        Line::from("Reconnect? (y/n)"),
    ];

    let dialog = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ratatui::style::Color::Yellow))
                .title(" Reconnect "),
        )
        .style(Style::default().bg(theme.bg()).fg(theme.fg()));

    frame.render_widget(dialog, dialog_area);
}

fn draw_status_bar(frame: &mut Frame, state: &SessionState, area: Rect) {
    let theme = state.theme();
    let indicator_color = match state.status {
        StatusLabel::Connected => ratatui::style::Color::Green,
        StatusLabel::Connecting => ratatui::style::Color::Yellow,
        StatusLabel::Disconnected | StatusLabel::Error => ratatui::style::Color::Red,
    };

    let line = Line::from(vec![
        ratatui::text::Span::styled(" ● ", Style::default().fg(indicator_color)),
        ratatui::text::Span::raw(format!(
            "{} │ [Enter] Run [↑↓] History [Ctrl+L] Clear [Ctrl+C] Cancel [PgUp/PgDn] Scroll [Ctrl+D] Quit ",
            status_text(state)
        )),
    ]);

    let paragraph =
        Paragraph::new(line).style(Style::default().bg(theme.selection_bg()).fg(theme.fg()));

    frame.render_widget(paragraph, area);
}
