//! Application setup, teardown, and main entry point.

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::Terminal;
use std::io::stdout;

use crate::actions::connection::ConnectionLink;
use crate::data::state::SessionState;
use crate::error::Result;
use crate::transforms::session;

/// Run the TUI against `endpoint` until the user quits.
pub fn run(state: &mut SessionState, endpoint: &str) -> Result<()> {
    let mut link = ConnectionLink::new(endpoint);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let mut terminal = Terminal::new(ratatui::backend::CrosstermBackend::new(stdout()))?;

    // Main loop
    let result = super::main_loop(&mut terminal, state, &mut link);

    // Session teardown, whatever ended the loop
    let effects = session::teardown(state);
    super::apply_effects(state, &mut link, effects);

    // Restore terminal
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}
