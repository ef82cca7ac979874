//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cibuild - Release decisions from CI environment metadata.
#[derive(Debug, Parser)]
#[command(name = "cibuild")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to repository root (overrides detection from the current directory)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Path to config file (overrides default release/cibuild.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Host platform (Linux, Darwin, Windows); defaults to the running system
    #[arg(long, global = true, value_name = "SYSTEM")]
    pub system: Option<String>,

    /// Git ref (overrides GITHUB_REF), e.g. refs/tags/v1.0.0
    #[arg(long = "ref", global = true, value_name = "REF")]
    pub github_ref: Option<String>,

    /// CI event name (overrides GITHUB_EVENT_NAME), e.g. push
    #[arg(long, global = true, value_name = "EVENT")]
    pub event: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the build environment and derived decisions (default)
    Info(InfoArgs),

    /// Check the declared version against the current tag
    CheckVersion,

    /// Print the archive file name for a bundle
    ArchiveName(ArchiveNameArgs),
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `archive-name` command.
#[derive(Debug, Clone, clap::Args)]
pub struct ArchiveNameArgs {
    /// Bundle name, e.g. mitmproxy
    pub bundle: String,
}
