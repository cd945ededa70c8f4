//! Transforms for the command line, history recall, and local shortcuts.

use tracing::debug;

use crate::data::effect::Effect;
use crate::data::message::ClientMessage;
use crate::data::state::SessionState;
use crate::fragment::Fragment;
use crate::queries::output::max_scroll_back;
use crate::queries::prompt::can_send;

/// Submit the current input line.
pub fn submit_input(state: &mut SessionState) -> Vec<Effect> {
    let command = state.input.text.clone();
    submit(state, &command)
}

/// Submit a command: echo it, record it, and send it if connected.
pub fn submit(state: &mut SessionState, command: &str) -> Vec<Effect> {
    if command.trim().is_empty() {
        return Vec::new();
    }

    let echo = format!(
        r#"<div class="command-echo">$ {}</div>"#,
        v_htmlescape::escape(command)
    );
    state.output.append(Fragment::parse(&echo));
    state.output.scroll_to_end();
    state.history.push(command);

    let mut effects = Vec::new();
    if can_send(state) {
        effects.push(Effect::Send(ClientMessage::new(command)));
    } else {
        debug!(command, "not connected, dropping command");
    }

    state.input.clear();
    effects
}

/// Up arrow.
pub fn recall_previous(state: &mut SessionState) {
    if let Some(entry) = state.history.older() {
        let entry = entry.to_string();
        state.input.set(&entry);
    }
}

/// Down arrow.
pub fn recall_next(state: &mut SessionState) {
    match state.history.newer() {
        Some(entry) => {
            let entry = entry.to_string();
            state.input.set(&entry);
        }
        None => state.input.clear(),
    }
}

/// Ctrl+L: drop rendered output without asking the server.
pub fn clear_screen(state: &mut SessionState) {
    state.output.clear();
}

/// Ctrl+C: abandon the current line.
pub fn cancel_input(state: &mut SessionState) {
    state.input.clear();
    state.output.append(Fragment::text_line("^C", &["warning"]));
    state.output.scroll_to_end();
}

pub fn insert_char(state: &mut SessionState, c: char) {
    let at = state.input.byte_index(state.input.cursor);
    state.input.text.insert(at, c);
    state.input.cursor += 1;
}

pub fn delete_before_cursor(state: &mut SessionState) {
    if state.input.cursor == 0 {
        return;
    }
    state.input.cursor -= 1;
    let at = state.input.byte_index(state.input.cursor);
    state.input.text.remove(at);
}

pub fn delete_at_cursor(state: &mut SessionState) {
    if state.input.cursor < state.input.text.chars().count() {
        let at = state.input.byte_index(state.input.cursor);
        state.input.text.remove(at);
    }
}

pub fn move_cursor_left(state: &mut SessionState) {
    state.input.cursor = state.input.cursor.saturating_sub(1);
}

pub fn move_cursor_right(state: &mut SessionState) {
    let len = state.input.text.chars().count();
    if state.input.cursor < len {
        state.input.cursor += 1;
    }
}

pub fn move_cursor_home(state: &mut SessionState) {
    state.input.cursor = 0;
}

pub fn move_cursor_end(state: &mut SessionState) {
    state.input.cursor = state.input.text.chars().count();
}

/// Scroll the output towards older rows, stopping at the first screenful.
pub fn scroll_up(state: &mut SessionState, rows: usize) {
    let max_back = max_scroll_back(
        &state.output,
        state.output_visible_width,
        state.output_visible_height,
    );
    state.output.scroll_back = (state.output.scroll_back + rows).min(max_back);
}

/// Scroll the output towards the newest line.
pub fn scroll_down(state: &mut SessionState, rows: usize) {
    state.output.scroll_back = state.output.scroll_back.saturating_sub(rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::config::ClientConfig;
    use crate::data::state::ConnectionState;
    use crate::queries::output::visible_rows;
    use crate::transforms::session::{begin_connect, handle_opened};

    fn make_state() -> SessionState {
        SessionState::new(ClientConfig::default())
    }

    fn connected_state() -> SessionState {
        let mut state = make_state();
        begin_connect(&mut state);
        handle_opened(&mut state);
        state
    }

    fn output_texts(state: &SessionState) -> Vec<String> {
        state.output.lines().iter().map(|l| l.text()).collect()
    }

    #[test]
    fn test_blank_submission_is_noop() {
        let mut state = connected_state();
        for blank in ["", "   ", "\t \n"] {
            state.input.set(blank);
            assert!(submit_input(&mut state).is_empty());
        }
        assert!(state.output.is_empty());
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_submit_sends_when_connected() {
        let mut state = connected_state();
        state.input.set("cat");
        let effects = submit_input(&mut state);
        assert_eq!(effects, vec![Effect::Send(ClientMessage::new("cat"))]);
        assert_eq!(output_texts(&state), vec!["$ cat"]);
        assert!(state.output.lines()[0].spans[0].has_class("command-echo"));
        assert_eq!(state.history.entries(), ["cat"]);
        assert!(state.history.is_fresh());
        assert!(state.input.text.is_empty());
    }

    #[test]
    fn test_submit_keeps_untrimmed_text() {
        let mut state = connected_state();
        let effects = submit(&mut state, " run \"game\" ");
        assert_eq!(effects, vec![Effect::Send(ClientMessage::new(" run \"game\" "))]);
        assert_eq!(state.history.entries(), [" run \"game\" "]);
    }

    #[test]
    fn test_submit_echo_is_escaped() {
        let mut state = connected_state();
        submit(&mut state, "echo <b>&</b>");
        assert_eq!(output_texts(&state), vec!["$ echo <b>&</b>"]);
    }

    #[test]
    fn test_submit_while_disconnected_is_dropped() {
        let mut state = make_state();
        assert_eq!(state.connection, ConnectionState::Disconnected);
        let effects = submit(&mut state, "disc");
        assert!(effects.is_empty());
        assert_eq!(state.history.entries(), ["disc"]);
        assert_eq!(output_texts(&state), vec!["$ disc"]);
    }

    #[test]
    fn test_history_round_trip() {
        let mut state = connected_state();
        for command in ["one", "two", "three"] {
            submit(&mut state, command);
        }

        recall_previous(&mut state);
        assert_eq!(state.input.text, "three");
        recall_previous(&mut state);
        assert_eq!(state.input.text, "two");
        recall_previous(&mut state);
        assert_eq!(state.input.text, "one");
        recall_previous(&mut state);
        assert_eq!(state.input.text, "one");

        recall_next(&mut state);
        assert_eq!(state.input.text, "two");
        recall_next(&mut state);
        assert_eq!(state.input.text, "three");
        recall_next(&mut state);
        assert_eq!(state.input.text, "");
        assert!(state.history.is_fresh());
    }

    #[test]
    fn test_recall_previous_on_empty_history_keeps_input() {
        let mut state = make_state();
        state.input.set("draft");
        recall_previous(&mut state);
        assert_eq!(state.input.text, "draft");
    }

    #[test]
    fn test_clear_screen_is_local() {
        let mut state = connected_state();
        submit(&mut state, "cat");
        clear_screen(&mut state);
        assert!(state.output.is_empty());
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn test_cancel_input_prints_marker() {
        let mut state = connected_state();
        state.input.set("half typed");
        cancel_input(&mut state);
        assert!(state.input.text.is_empty());
        assert_eq!(output_texts(&state), vec!["^C"]);
        assert!(state.output.lines()[0].spans[0].has_class("warning"));
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_line_editing() {
        let mut state = make_state();
        for c in "cd".chars() {
            insert_char(&mut state, c);
        }
        move_cursor_home(&mut state);
        insert_char(&mut state, 'x');
        assert_eq!(state.input.text, "xcd");
        move_cursor_right(&mut state);
        delete_at_cursor(&mut state);
        assert_eq!(state.input.text, "xc");
        delete_before_cursor(&mut state);
        assert_eq!(state.input.text, "x");
        move_cursor_end(&mut state);
        delete_before_cursor(&mut state);
        delete_before_cursor(&mut state);
        assert_eq!(state.input.text, "");
        move_cursor_left(&mut state);
        assert_eq!(state.input.cursor, 0);
    }

    #[test]
    fn test_scroll_bounds() {
        let mut state = make_state();
        state.output_visible_height = 1;
        state.output.append(Fragment::parse("1\n2\n3"));
        scroll_up(&mut state, 10);
        assert_eq!(state.output.scroll_back, 2);
        scroll_down(&mut state, 1);
        assert_eq!(state.output.scroll_back, 1);
        scroll_down(&mut state, 5);
        assert_eq!(state.output.scroll_back, 0);
    }

    #[test]
    fn test_scroll_reaches_rows_of_a_wrapped_line() {
        let mut state = make_state();
        state.output_visible_width = 10;
        state.output_visible_height = 5;
        state.output.append(Fragment::parse(&"x".repeat(100)));

        scroll_up(&mut state, 50);
        assert_eq!(state.output.scroll_back, 5);
        let (rows, back) = visible_rows(&state.output, 10, 5);
        assert_eq!(back, 5);
        assert_eq!(rows.len(), 5);

        // No dead zone on the way back down.
        scroll_down(&mut state, 1);
        let (_, back) = visible_rows(&state.output, 10, 5);
        assert_eq!(back, 4);
    }

    #[test]
    fn test_short_output_does_not_scroll() {
        let mut state = make_state();
        state.output.append(Fragment::parse("1\n2\n3"));
        scroll_up(&mut state, 10);
        assert_eq!(state.output.scroll_back, 0);
    }
}
