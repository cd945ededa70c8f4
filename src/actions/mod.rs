//! Side effects: the server connection and config files.

pub mod connection;
pub mod files;
