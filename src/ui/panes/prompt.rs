//! Prompt line rendering.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::data::state::{InputLine, SessionState};
use crate::queries::prompt::prompt_path;

/// What fits of the prompt in `width` columns.
#[derive(Debug, PartialEq, Eq)]
struct PromptView {
    prefix: String,
    input: String,
    /// Cursor column relative to the start of the shown text.
    cursor_col: usize,
}

/// Drop leading characters until the cursor fits in `width` columns.
fn prompt_view(prefix: &str, input: &InputLine, width: usize) -> PromptView {
    let prefix_len = prefix.chars().count();
    let chars: Vec<char> = prefix.chars().chain(input.text.chars()).collect();
    let cursor_at = prefix_len + input.cursor;
    let column = |c: &char| c.width().unwrap_or(0);

    let mut cursor_col: usize = chars.iter().take(cursor_at).map(column).sum();
    let mut skip = 0;
    while skip < cursor_at && cursor_col + 1 > width {
        cursor_col -= column(&chars[skip]);
        skip += 1;
    }

    let split = prefix_len.max(skip);
    PromptView {
        prefix: chars[skip..split].iter().collect(),
        input: chars[split..].iter().collect(),
        cursor_col,
    }
}

/// Draw the prompt with the shortened path and the input line.
pub fn draw(frame: &mut Frame, state: &SessionState, area: Rect) {
    let theme = state.theme();
    let prefix = format!("{} $ ", prompt_path(state));
    let inner_width = area.width.saturating_sub(2) as usize;
    let view = prompt_view(&prefix, &state.input, inner_width);

    let line = Line::from(vec![
        Span::styled(
            view.prefix,
            Style::default()
                .fg(theme.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(view.input),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent())),
    );
    frame.render_widget(paragraph, area);

    if !state.confirm_reconnect && view.cursor_col < inner_width {
        let x = area.x + 1 + view.cursor_col as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}
