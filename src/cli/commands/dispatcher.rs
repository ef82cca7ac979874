//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::env::VarError;

use crate::cli::args::{Cli, Commands, InfoArgs};
use crate::config::{detect_project_root, load_config};
use crate::environ::source::process_env;
use crate::environ::{BuildEnviron, BuildEnvironBuilder, System};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    environ: BuildEnviron,
}

impl CommandDispatcher {
    /// Create a new dispatcher for an existing snapshot.
    pub fn new(environ: BuildEnviron) -> Self {
        Self { environ }
    }

    /// Build the snapshot from the process environment and global flags.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Self::from_cli_with(cli, process_env)
    }

    /// Like [`from_cli`](Self::from_cli), with a custom env var lookup.
    pub fn from_cli_with<F>(cli: &Cli, env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let root = match &cli.root {
            Some(root) => root.clone(),
            None => detect_project_root()?,
        };
        let config = load_config(&root, cli.config.as_deref())?;

        let mut builder = BuildEnvironBuilder::from_lookup(env_fn)
            .root_dir(root)
            .config(config);

        if let Some(system) = &cli.system {
            builder = builder.system(System::from_identifier(system));
        }
        if let Some(github_ref) = &cli.github_ref {
            builder = builder.github_ref(github_ref.as_str());
        }
        if let Some(event) = &cli.event {
            builder = builder.github_event_name(event.as_str());
        }

        let environ = builder.build();
        tracing::debug!("Build environment: {:?}", environ);
        Ok(Self::new(environ))
    }

    /// Get the build environment snapshot.
    pub fn environ(&self) -> &BuildEnviron {
        &self.environ
    }

    /// Dispatch and execute a command.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        match &cli.command {
            Some(Commands::Info(args)) => {
                let cmd = super::info::InfoCommand::new(&self.environ, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::CheckVersion) => {
                let cmd = super::check_version::CheckVersionCommand::new(&self.environ);
                cmd.execute(ui)
            }
            Some(Commands::ArchiveName(args)) => {
                let cmd = super::archive_name::ArchiveNameCommand::new(&self.environ, args.clone());
                cmd.execute(ui)
            }
            None => {
                // Default to info with default args
                let cmd = super::info::InfoCommand::new(&self.environ, InfoArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
