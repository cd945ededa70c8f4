//! Queries for the prompt and the status indicator.

use crate::data::state::{ConnectionState, SessionState, StatusLabel};

/// Marker shown in place of the user's home directory.
pub const HOME_MARKER: &str = "~";

/// Shorten a working directory by collapsing a `<root>/<user>` home prefix
/// into `~`.
///
/// The prefix must end on a segment boundary, so `/home/ann` matches
/// `/home/ann/dev` but not `/home/anna`. An empty result shows the marker.
pub fn shorten_path(path: &str, home_roots: &[String]) -> String {
    for root in home_roots {
        let root = root.trim_end_matches('/');
        let Some(after_root) = path.strip_prefix(root) else {
            continue;
        };
        let Some(user_and_rest) = after_root.strip_prefix('/') else {
            continue;
        };
        let user = user_and_rest.split('/').next().unwrap_or_default();
        if user.is_empty() {
            continue;
        }
        let rest = &user_and_rest[user.len()..];
        return format!("{}{}", HOME_MARKER, rest);
    }

    if path.is_empty() {
        HOME_MARKER.to_string()
    } else {
        path.to_string()
    }
}

/// Prompt label for the current working directory.
pub fn prompt_path(state: &SessionState) -> String {
    shorten_path(&state.cwd, &state.config.home_roots)
}

/// Status indicator text, with the connection time once connected.
pub fn status_text(state: &SessionState) -> String {
    match (state.status, state.connected_at) {
        (StatusLabel::Connected, Some(at)) => {
            format!("{} since {}", state.status.text(), at.format("%H:%M:%S"))
        }
        (status, _) => status.text().to_string(),
    }
}

/// True when typed commands would reach the server.
pub fn can_send(state: &SessionState) -> bool {
    state.connection == ConnectionState::Connected
}
