//! Pure data: configuration, session state, wire envelopes.

pub mod config;
pub mod effect;
pub mod history;
pub mod message;
pub mod schedule;
pub mod state;
