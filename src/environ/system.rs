//! Host operating system detection.

use std::fmt;
use std::str::FromStr;

use crate::error::{BuildError, Result};

/// Known build host systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum System {
    Linux,
    Darwin,
    Windows,
    #[default]
    Unknown,
}

impl System {
    /// The system this binary was compiled for.
    pub fn current() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Parse a platform identifier.
    ///
    /// Accepts both `uname`-style names (`Linux`, `Darwin`, `Windows`) and
    /// Rust target names (`linux`, `macos`, `windows`), case-insensitively.
    /// Anything else maps to [`System::Unknown`].
    pub fn from_identifier(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "linux" => System::Linux,
            "darwin" | "macos" | "osx" => System::Darwin,
            "windows" | "win32" => System::Windows,
            _ => System::Unknown,
        }
    }

    /// Short platform tag used in archive names.
    pub fn platform_tag(&self) -> Result<&'static str> {
        match self {
            System::Darwin => Ok("osx"),
            System::Windows => Ok("windows"),
            System::Linux => Ok("linux"),
            System::Unknown => Err(BuildError::environment(format!(
                "Unsupported platform: {}",
                self
            ))),
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, System::Windows)
    }

    /// Archive extension: zip on Windows, gzip tarball elsewhere.
    pub fn archive_extension(&self) -> &'static str {
        if self.is_windows() {
            "zip"
        } else {
            "tar.gz"
        }
    }
}

impl FromStr for System {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from_identifier(s))
    }
}

impl fmt::Display for System {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            System::Linux => "Linux",
            System::Darwin => "Darwin",
            System::Windows => "Windows",
            System::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
