//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{CibuildTheme, UserInterface};

/// Writes messages to stdout and errors to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: CibuildTheme,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(color: bool) -> Self {
        let theme = if color {
            CibuildTheme::new()
        } else {
            CibuildTheme::plain()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.theme.format_success(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }
}
