//! Archive-name command implementation.

use crate::cli::args::ArchiveNameArgs;
use crate::environ::BuildEnviron;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Prints the archive file name for a bundle on this platform.
pub struct ArchiveNameCommand<'a> {
    environ: &'a BuildEnviron,
    args: ArchiveNameArgs,
}

impl<'a> ArchiveNameCommand<'a> {
    pub fn new(environ: &'a BuildEnviron, args: ArchiveNameArgs) -> Self {
        Self { environ, args }
    }
}

impl Command for ArchiveNameCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if !self.environ.bdists().contains_key(&self.args.bundle) {
            ui.warning(&format!("Unknown bundle: {}", self.args.bundle));
        }

        let name = self.environ.archive_name(&self.args.bundle)?;
        ui.message(&name);
        Ok(CommandResult::success())
    }
}
