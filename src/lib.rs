//! webconsole — a TUI client for the web console WebSocket endpoint.

pub mod actions;
pub mod data;
pub mod error;
pub mod fragment;
pub mod logging;
pub mod queries;
pub mod transforms;
pub mod ui;
