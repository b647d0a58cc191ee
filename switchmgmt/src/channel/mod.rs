//! Channel layer for the interactive CLI.
//!
//! Prompt-terminated reads over a PTY shell, ANSI stripping, and command
//! echo removal.

mod buffer;
pub mod prompt;
mod shell;

pub use buffer::PatternBuffer;
pub use shell::ShellChannel;
