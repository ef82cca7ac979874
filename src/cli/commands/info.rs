//! Info command implementation.
//!
//! The `cibuild info` command prints the snapshot and every derived
//! decision, either as `cibuild.<name>=<value>` lines or as JSON.

use crate::cli::args::InfoArgs;
use crate::environ::BuildEnviron;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The info command implementation.
pub struct InfoCommand<'a> {
    environ: &'a BuildEnviron,
    args: InfoArgs,
}

impl<'a> InfoCommand<'a> {
    /// Create a new info command.
    pub fn new(environ: &'a BuildEnviron, args: InfoArgs) -> Self {
        Self { environ, args }
    }
}

impl Command for InfoCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.json {
            let json = serde_json::to_string_pretty(&self.environ.info())
                .map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let mut buf = Vec::new();
        self.environ.dump_info(&mut buf)?;
        for line in String::from_utf8_lossy(&buf).lines() {
            ui.message(line);
        }

        Ok(CommandResult::success())
    }
}
