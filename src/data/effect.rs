//! Side-effect descriptions returned by transforms.

use super::message::ClientMessage;

/// Effects that the UI layer should execute.
/// Transforms return these instead of performing side effects directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open a new connection to the configured endpoint, replacing any
    /// existing one.
    Connect,
    /// Transmit an envelope over the open connection.
    Send(ClientMessage),
    /// Close the current connection.
    CloseConnection,
    /// Quit the application.
    Quit,
}
