//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which builds the
//! [`BuildEnviron`](crate::environ::BuildEnviron) once from the process
//! environment and global flags, then routes subcommands to their
//! implementations.

pub mod archive_name;
pub mod check_version;
pub mod dispatcher;
pub mod info;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
