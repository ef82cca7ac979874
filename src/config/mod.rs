//! Release configuration for cibuild.
//!
//! This module handles the optional per-project settings file:
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use cibuild::config::load_release_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::create_dir_all(temp.path().join("release")).unwrap();
//! fs::write(
//!     temp.path().join("release/cibuild.yml"),
//!     "default_branch: main",
//! )
//! .unwrap();
//!
//! let config = load_release_config(temp.path()).unwrap();
//! assert_eq!(config.default_branch, "main");
//! assert_eq!(config.project, "mitmproxy");
//! ```
//!
//! # Configuration File Location
//!
//! The settings file lives at `release/cibuild.yml` under the repository
//! root. When it is absent every field takes its default.

pub mod loader;
pub mod schema;

pub use loader::{
    detect_project_root, find_project_root, load_config, load_config_file, load_release_config, parse_config,
    CONFIG_PATH,
};
pub use schema::ReleaseConfig;
