//! qst-cli library root.
//!
//! Exposes the config, session and listing modules so integration tests
//! can exercise them without going through the command line.

pub mod config;
pub mod listing;
pub mod session;
