//! Configuration schema for `release/cibuild.yml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Project settings that parameterize the release decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseConfig {
    /// Project name (for display purposes)
    pub project: String,

    /// Version declaration file, relative to the repository root
    pub version_file: PathBuf,

    /// Development branch whose pushes publish `dev` images
    pub default_branch: String,

    /// Docker image repository, without tag
    pub docker_repository: String,

    /// Bundle name to the executables it ships, in order
    pub bundles: BTreeMap<String, Vec<String>>,

    /// Executables that are left out of Windows bundles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub console_tools: Vec<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        let mut bundles = BTreeMap::new();
        bundles.insert(
            "mitmproxy".to_string(),
            vec![
                "mitmproxy".to_string(),
                "mitmdump".to_string(),
                "mitmweb".to_string(),
            ],
        );

        Self {
            project: "mitmproxy".to_string(),
            version_file: PathBuf::from("mitmproxy").join("version.py"),
            default_branch: "master".to_string(),
            docker_repository: "mitmproxy/mitmproxy".to_string(),
            bundles,
            console_tools: vec!["mitmproxy".to_string()],
        }
    }
}
