//! CLI module for the break timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: The interactive single-threaded event loop

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{Cli, Commands, RunArgs, SessionCommand};
pub use display::{Display, OutputMode};
pub use session::{Session, SessionNotice, SHUTDOWN_GRACE};
