//! Pure data types for session state.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use super::config::ClientConfig;
use super::history::History;
use super::schedule::{Scheduler, TaskHandle};
use crate::fragment::{Fragment, FragmentLine};

/// Lifecycle of the single server connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Closing,
}

/// Text shown by the status indicator.
///
/// Kept apart from [`ConnectionState`] because a transport error changes
/// the label without changing the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLabel {
    Connecting,
    Connected,
    #[default]
    Disconnected,
    Error,
}

impl StatusLabel {
    pub fn text(self) -> &'static str {
        match self {
            StatusLabel::Connecting => "Connecting",
            StatusLabel::Connected => "Connected",
            StatusLabel::Disconnected => "Disconnected",
            StatusLabel::Error => "Error",
        }
    }
}

/// Theme for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn bg(self) -> Color {
        match self {
            Theme::Dark => Color::Black,
            Theme::Light => Color::White,
        }
    }

    pub fn fg(self) -> Color {
        match self {
            Theme::Dark => Color::White,
            Theme::Light => Color::Black,
        }
    }

    pub fn dim(self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::Gray,
        }
    }

    pub fn selection_bg(self) -> Color {
        match self {
            Theme::Dark => Color::DarkGray,
            Theme::Light => Color::LightBlue,
        }
    }

    pub fn accent(self) -> Color {
        match self {
            Theme::Dark => Color::Cyan,
            Theme::Light => Color::Blue,
        }
    }
}

/// Rendered output with bounded scrollback.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<FragmentLine>,
    capacity: usize,
    /// Lines scrolled back from the end; 0 follows new output.
    pub scroll_back: usize,
}

impl OutputBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity: capacity.max(1),
            scroll_back: 0,
        }
    }

    /// Append a rendered fragment, dropping the oldest lines past capacity.
    pub fn append(&mut self, fragment: Fragment) {
        self.lines.extend(fragment.lines);
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_back = 0;
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_back = 0;
    }

    pub fn lines(&self) -> &VecDeque<FragmentLine> {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Editable command line with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputLine {
    pub text: String,
    /// Cursor position in characters.
    pub cursor: usize,
}

impl InputLine {
    /// Replace the text and move the cursor to its end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub(crate) fn byte_index(&self, char_pos: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }
}

/// Session state — no methods with side effects.
pub struct SessionState {
    pub config: ClientConfig,
    pub connection: ConnectionState,
    pub status: StatusLabel,
    /// Wall-clock time the current connection opened.
    pub connected_at: Option<DateTime<Local>>,
    pub output: OutputBuffer,
    pub history: History,
    pub input: InputLine,
    /// Working directory last reported by the server.
    pub cwd: String,
    pub scheduler: Scheduler,
    pub pending_reconnect_prompt: Option<TaskHandle>,
    pub pending_exit_close: Option<TaskHandle>,
    // Show reconnect confirmation dialog
    pub confirm_reconnect: bool,
    pub should_quit: bool,
    // Visible size of the output pane (updated during draw)
    pub output_visible_height: usize,
    pub output_visible_width: usize,
}

impl SessionState {
    pub fn new(config: ClientConfig) -> Self {
        let output = OutputBuffer::new(config.scrollback);
        Self {
            config,
            connection: ConnectionState::Disconnected,
            status: StatusLabel::Disconnected,
            connected_at: None,
            output,
            history: History::new(),
            input: InputLine::default(),
            cwd: "~".to_string(),
            scheduler: Scheduler::new(),
            pending_reconnect_prompt: None,
            pending_exit_close: None,
            confirm_reconnect: false,
            should_quit: false,
            output_visible_height: 20,
            output_visible_width: 80,
        }
    }

    pub fn theme(&self) -> Theme {
        self.config.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_default_is_dark() {
        assert_eq!(Theme::default(), Theme::Dark);
    }

    #[test]
    fn test_theme_colors_differ() {
        assert_ne!(Theme::Dark.bg(), Theme::Light.bg());
        assert_ne!(Theme::Dark.fg(), Theme::Light.fg());
        assert_ne!(Theme::Dark.selection_bg(), Theme::Light.selection_bg());
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let state = SessionState::new(ClientConfig::default());
        assert_eq!(state.connection, ConnectionState::Disconnected);
        assert_eq!(state.status, StatusLabel::Disconnected);
        assert_eq!(state.cwd, "~");
        assert!(state.history.is_fresh());
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_output_buffer_caps_scrollback() {
        let mut output = OutputBuffer::new(2);
        output.append(Fragment::parse("<div>a</div><div>b</div><div>c</div>"));
        assert_eq!(output.len(), 2);
        assert_eq!(output.lines()[0].text(), "b");
        assert_eq!(output.lines()[1].text(), "c");
    }

    #[test]
    fn test_output_buffer_clear_resets_scroll() {
        let mut output = OutputBuffer::new(10);
        output.append(Fragment::parse("x"));
        output.scroll_back = 3;
        output.clear();
        assert!(output.is_empty());
        assert_eq!(output.scroll_back, 0);
    }

    #[test]
    fn test_input_line_set_moves_cursor() {
        let mut input = InputLine::default();
        input.set("dir ñ");
        assert_eq!(input.cursor, 5);
        assert_eq!(input.byte_index(4), 4);
        assert_eq!(input.byte_index(5), input.text.len());
    }

    #[test]
    fn test_status_label_text() {
        assert_eq!(StatusLabel::Connected.text(), "Connected");
        assert_eq!(StatusLabel::Error.text(), "Error");
    }
}
