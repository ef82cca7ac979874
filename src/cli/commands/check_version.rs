//! Check-version command implementation.
//!
//! The `cibuild check-version` command fails the pipeline when the declared
//! version and the git tag disagree.

use crate::environ::BuildEnviron;
use crate::error::{BuildError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The check-version command implementation.
pub struct CheckVersionCommand<'a> {
    environ: &'a BuildEnviron,
}

impl<'a> CheckVersionCommand<'a> {
    /// Create a new check-version command.
    pub fn new(environ: &'a BuildEnviron) -> Self {
        Self { environ }
    }
}

impl Command for CheckVersionCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match self.environ.check_version() {
            Ok(()) => {
                let tag = self.environ.tag();
                if tag.is_empty() {
                    ui.success("Version is a dev snapshot");
                } else {
                    ui.success(&format!("Version matches tag {}", tag));
                }
                Ok(CommandResult::success())
            }
            Err(e @ BuildError::Validation { .. }) => {
                ui.error(&e.to_string());
                Ok(CommandResult::failure(1))
            }
            Err(e) => Err(e),
        }
    }
}
