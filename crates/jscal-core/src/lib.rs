//! Shared foundation for the jscal crates: settings, core errors and
//! the constants every layer agrees on.

pub mod config;
pub mod constants;
pub mod error;
