//! Version declaration parsing and release-version conventions.
//!
//! The declaration is a source file containing a single assignment such
//! as `VERSION = "3.0.0.dev"`. It is read with a regex rather than a
//! language parser.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{BuildError, Result};

/// Matches the `VERSION = "..."` assignment at the start of a line.
static VERSION_DECL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^VERSION\s*=\s*["']([^"']+)["']"#).expect("VERSION_DECL_REGEX must compile")
});

/// Dev-suffix marker: `.dev`, optionally numbered.
static DEV_SUFFIX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.dev\d*$").expect("DEV_SUFFIX_REGEX must compile"));

/// Clean release: dotted numeric components only.
static RELEASE_VERSION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*$").expect("RELEASE_VERSION_REGEX must compile"));

/// Extract the declared version string from file contents.
pub fn extract_version(contents: &str) -> Option<&str> {
    VERSION_DECL_REGEX
        .captures(contents)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Read the declared version from `version_file` under `root`.
///
/// # Errors
///
/// Returns `Validation` when the file is unreadable or has no
/// `VERSION` assignment; either way the version cannot be checked.
pub fn read_declared_version(root: &Path, version_file: &Path) -> Result<String> {
    let path = root.join(version_file);
    let contents = fs::read_to_string(&path).map_err(|e| {
        BuildError::validation(format!("Cannot read {}: {}", path.display(), e))
    })?;

    let version = extract_version(&contents).ok_or_else(|| {
        BuildError::validation(format!("No VERSION declaration in {}", path.display()))
    })?;

    tracing::debug!("Declared version {} in {}", version, path.display());
    Ok(version.to_string())
}

/// Whether the version carries the dev-suffix marker.
pub fn is_dev_version(version: &str) -> bool {
    DEV_SUFFIX_REGEX.is_match(version)
}

/// Whether the version is a clean release (no pre-release or dev suffix).
pub fn is_release_version(version: &str) -> bool {
    RELEASE_VERSION_REGEX.is_match(version)
}

/// Check a tag (possibly empty) against the declared version.
///
/// - No tag: the declared version must be a dev version.
/// - `v`-prefixed tag: the remainder must equal the declared version, and
///   that version must be a clean release.
/// - Any other tag is an ad-hoc build and needs a dev version.
pub fn validate_tag(tag: &str, declared: &str) -> Result<()> {
    if tag.is_empty() {
        if !is_dev_version(declared) {
            return Err(BuildError::validation(format!(
                "Non-production releases must have dev suffix: {}",
                declared
            )));
        }
        return Ok(());
    }

    if let Some(tagged) = tag.strip_prefix('v') {
        if tagged != declared {
            return Err(BuildError::validation(format!(
                "Tag is {}, but declared version is {}",
                tag, declared
            )));
        }
        if !is_release_version(declared) {
            return Err(BuildError::validation(format!(
                "Release tag {} must name a plain release version, not {}",
                tag, declared
            )));
        }
        return Ok(());
    }

    if !is_dev_version(declared) {
        return Err(BuildError::validation(format!(
            "Tag {} has no v prefix; ad-hoc tags require a dev version, found {}",
            tag, declared
        )));
    }
    Ok(())
}
