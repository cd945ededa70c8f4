//! Transforms for the connection lifecycle and inbound envelopes.

use std::time::Instant;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::data::effect::Effect;
use crate::data::message::ServerMessage;
use crate::data::schedule::DeferredAction;
use crate::data::state::{ConnectionState, SessionState, StatusLabel};
use crate::fragment::Fragment;

/// Start connecting to the configured endpoint.
pub fn begin_connect(state: &mut SessionState) -> Vec<Effect> {
    if let Some(handle) = state.pending_reconnect_prompt.take() {
        state.scheduler.cancel(handle);
    }
    state.confirm_reconnect = false;
    state.connection = ConnectionState::Connecting;
    state.status = StatusLabel::Connecting;
    vec![Effect::Connect]
}

/// The connection is open.
pub fn handle_opened(state: &mut SessionState) {
    info!("connected");
    state.connection = ConnectionState::Connected;
    state.status = StatusLabel::Connected;
    state.connected_at = Some(Local::now());
}

/// Apply one inbound text frame.
pub fn handle_message(state: &mut SessionState, text: &str, now: Instant) {
    let message = match ServerMessage::parse(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(error = %e, "ignoring malformed envelope");
            return;
        }
    };

    match message {
        ServerMessage::Welcome { html, cwd } | ServerMessage::Output { html, cwd } => {
            state.output.append(Fragment::parse(&html));
            if let Some(cwd) = cwd.filter(|c| !c.is_empty()) {
                state.cwd = cwd;
            }
        }
        ServerMessage::Clear => state.output.clear(),
        ServerMessage::Exit { html } => {
            state.output.append(Fragment::parse(&html));
            if let Some(handle) = state.pending_exit_close.take() {
                state.scheduler.cancel(handle);
            }
            let due = now + state.config.exit_close_delay();
            state.pending_exit_close =
                Some(state.scheduler.schedule(due, DeferredAction::CloseAfterExit));
        }
        ServerMessage::Unknown => debug!("ignoring envelope of unknown type"),
    }

    state.output.scroll_to_end();
}

/// A transport error. Only the status label changes.
pub fn handle_error(state: &mut SessionState, error: &str) {
    warn!(%error, "connection error");
    state.status = StatusLabel::Error;
}

/// The connection closed, for whatever reason.
pub fn handle_closed(state: &mut SessionState, now: Instant) {
    info!("disconnected");
    state.connection = ConnectionState::Disconnected;
    state.status = StatusLabel::Disconnected;
    state.connected_at = None;

    if let Some(handle) = state.pending_exit_close.take() {
        state.scheduler.cancel(handle);
    }
    if let Some(handle) = state.pending_reconnect_prompt.take() {
        state.scheduler.cancel(handle);
    }
    let due = now + state.config.reconnect_prompt_delay();
    state.pending_reconnect_prompt =
        Some(state.scheduler.schedule(due, DeferredAction::PromptReconnect));
}

/// Run every deferred action due at `now`.
pub fn run_due_tasks(state: &mut SessionState, now: Instant) -> Vec<Effect> {
    let mut effects = Vec::new();
    for action in state.scheduler.take_due(now) {
        match action {
            DeferredAction::CloseAfterExit => {
                state.pending_exit_close = None;
                if matches!(
                    state.connection,
                    ConnectionState::Connected | ConnectionState::Connecting
                ) {
                    state.connection = ConnectionState::Closing;
                    effects.push(Effect::CloseConnection);
                }
                state.status = StatusLabel::Disconnected;
            }
            DeferredAction::PromptReconnect => {
                state.pending_reconnect_prompt = None;
                if state.connection == ConnectionState::Disconnected {
                    state.confirm_reconnect = true;
                }
            }
        }
    }
    effects
}

/// User accepted the reconnect dialog.
pub fn confirm_reconnect(state: &mut SessionState) -> Vec<Effect> {
    state.confirm_reconnect = false;
    begin_connect(state)
}

/// User declined the reconnect dialog.
pub fn decline_reconnect(state: &mut SessionState) {
    state.confirm_reconnect = false;
}

/// Cancel all deferred work and close the connection.
pub fn teardown(state: &mut SessionState) -> Vec<Effect> {
    state.scheduler.cancel_all();
    state.pending_exit_close = None;
    state.pending_reconnect_prompt = None;
    state.confirm_reconnect = false;

    let mut effects = Vec::new();
    if state.connection != ConnectionState::Disconnected {
        state.connection = ConnectionState::Closing;
        effects.push(Effect::CloseConnection);
    }
    effects
}

/// Tear down and leave.
pub fn request_quit(state: &mut SessionState) -> Vec<Effect> {
    let mut effects = teardown(state);
    effects.push(Effect::Quit);
    effects
}
