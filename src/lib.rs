//! cibuild - Release decisions derived from CI environment metadata.
//!
//! cibuild looks at what a CI run knows about itself (platform, git ref,
//! event name, build switches, which credentials exist) and answers the
//! questions a release pipeline asks: which version is this, is it a
//! production release, where do artifacts go, and should we upload to
//! PyPI, Docker Hub or S3.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Optional `release/cibuild.yml` project settings
//! - [`environ`] - The build environment snapshot and derived decisions
//! - [`error`] - Error types and result aliases
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use cibuild::environ::{BuildEnviron, System};
//!
//! let env = BuildEnviron::builder()
//!     .system(System::Darwin)
//!     .root_dir("/repo")
//!     .github_ref("refs/tags/v0.0.1")
//!     .build();
//!
//! assert_eq!(env.version().unwrap(), "0.0.1");
//! assert_eq!(
//!     env.archive_name("mitmproxy").unwrap(),
//!     "mitmproxy-0.0.1-osx.tar.gz"
//! );
//! ```

pub mod cli;
pub mod config;
pub mod environ;
pub mod error;
pub mod ui;

pub use environ::{bool_from_env, BuildEnviron};
pub use error::{BuildError, Result};
