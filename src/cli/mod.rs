//! Command-line interface for music-courier.
//!
//! This module provides CLI commands for requesting albums and inspecting
//! the downstream library's state.

mod commands;

pub use commands::{Cli, Commands, run_command};
