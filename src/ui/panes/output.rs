//! Output pane rendering.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::state::{SessionState, Theme};
use crate::fragment::{FragmentLine, FragmentSpan};
use crate::queries::output::visible_rows;

/// Style for a span, built from its classes outermost first so inner
/// elements win.
pub fn span_style(span: &FragmentSpan, theme: Theme) -> Style {
    span.classes
        .iter()
        .fold(Style::default(), |style, class| apply_class(style, class, theme))
}

fn apply_class(style: Style, class: &str, theme: Theme) -> Style {
    match class {
        "ansi-bold" => style.add_modifier(Modifier::BOLD),
        "ansi-dim" => style.add_modifier(Modifier::DIM),
        "ansi-black" => style.fg(Color::Black),
        "ansi-red" => style.fg(Color::Red),
        "ansi-green" => style.fg(Color::Green),
        "ansi-yellow" => style.fg(Color::Yellow),
        "ansi-blue" => style.fg(Color::Blue),
        "ansi-magenta" => style.fg(Color::Magenta),
        "ansi-cyan" => style.fg(Color::Cyan),
        "ansi-white" => style.fg(Color::Gray),
        "ansi-bright-black" => style.fg(Color::DarkGray),
        "ansi-bright-red" => style.fg(Color::LightRed),
        "ansi-bright-green" => style.fg(Color::LightGreen),
        "ansi-bright-yellow" => style.fg(Color::LightYellow),
        "ansi-bright-blue" => style.fg(Color::LightBlue),
        "ansi-bright-magenta" => style.fg(Color::LightMagenta),
        "ansi-bright-cyan" => style.fg(Color::LightCyan),
        "ansi-bright-white" => style.fg(Color::White),
        "error" | "stderr" => style.fg(Color::Red),
        "success" => style.fg(Color::Green),
        "warning" => style.fg(Color::Yellow),
        "path" => style.fg(Color::Blue),
        "cmd" => style.fg(Color::Yellow).add_modifier(Modifier::BOLD),
        "logo" => style.fg(theme.accent()),
        "subtitle" => style.fg(theme.dim()),
        "command-echo" => style.fg(theme.accent()).add_modifier(Modifier::BOLD),
        _ => style,
    }
}

fn to_line(line: &FragmentLine, theme: Theme) -> Line<'static> {
    Line::from(
        line.spans
            .iter()
            .map(|span| Span::styled(span.text.clone(), span_style(span, theme)))
            .collect::<Vec<_>>(),
    )
}

/// Draw the output pane.
pub fn draw(frame: &mut Frame, state: &SessionState, area: Rect) {
    let theme = state.theme();
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;

    let (rows, back) = visible_rows(&state.output, inner_width, inner_height);
    let content: Vec<Line> = rows.iter().map(|row| to_line(row, theme)).collect();

    let title = if back > 0 {
        format!(" Output (scrolled back {} lines, PgDn to follow) ", back)
    } else {
        " Output ".to_string()
    };

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.dim()))
            .title(title),
    );

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Fragment;

    #[test]
    fn test_inner_class_wins() {
        let fragment =
            Fragment::parse(r#"<div class="stderr"><span class="ansi-green">ok</span></div>"#);
        let style = span_style(&fragment.lines[0].spans[0], Theme::Dark);
        assert_eq!(style.fg, Some(Color::Green));
    }

    #[test]
    fn test_modifiers_combine() {
        let fragment = Fragment::parse(r#"<span class="ansi-bold ansi-dim ansi-cyan">x</span>"#);
        let style = span_style(&fragment.lines[0].spans[0], Theme::Dark);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert!(style.add_modifier.contains(Modifier::DIM));
        assert_eq!(style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_unknown_class_is_plain() {
        let fragment = Fragment::parse(r#"<div class="stdout">x</div>"#);
        let style = span_style(&fragment.lines[0].spans[0], Theme::Light);
        assert_eq!(style, Style::default());
    }
}
