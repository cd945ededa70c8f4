//! Read-only derivations from session state.

pub mod output;
pub mod prompt;
