//! State transforms. Each returns the effects it wants performed.

pub mod input;
pub mod session;
