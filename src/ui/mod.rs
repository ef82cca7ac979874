//! Terminal output for the CLI.
//!
//! This module provides:
//! - [`UserInterface`] trait so commands can be tested without a terminal
//! - [`TerminalUI`] writing styled output to stdout/stderr
//! - [`MockUI`] capturing output for assertions

pub mod mock;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use terminal::TerminalUI;
pub use theme::CibuildTheme;

/// Trait for user-facing output.
pub trait UserInterface {
    /// Display a plain message.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);
}
