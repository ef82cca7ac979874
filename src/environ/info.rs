//! Human-readable and JSON summaries of a build environment.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use super::BuildEnviron;
use crate::error::Result;

/// Serializable summary of the snapshot and its derived decisions.
///
/// Derived values that cannot be computed for this snapshot are `None`.
/// Credentials are reported by presence only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironInfo {
    pub system: String,
    pub root_dir: PathBuf,
    pub github_ref: String,
    pub github_event_name: String,
    pub version: Option<String>,
    pub tag: String,
    pub branch: String,
    pub platform_tag: Option<String>,
    pub release_dir: PathBuf,
    pub build_dir: PathBuf,
    pub dist_dir: PathBuf,
    pub bdists: BTreeMap<String, Vec<String>>,
    pub upload_dir: Option<String>,
    pub docker_tag: Option<String>,
    pub is_pull_request: bool,
    pub is_prod_release: bool,
    pub is_maintenance_branch: bool,
    pub should_build_wheel: bool,
    pub should_build_pyinstaller: bool,
    pub should_build_docker: bool,
    pub has_docker_creds: bool,
    pub has_aws_creds: bool,
    pub has_twine_creds: bool,
    pub should_upload_aws: bool,
    pub should_upload_docker: bool,
    pub should_upload_pypi: bool,
}

impl BuildEnviron {
    /// Collect the snapshot and every derived decision.
    pub fn info(&self) -> EnvironInfo {
        EnvironInfo {
            system: self.system.to_string(),
            root_dir: self.root_dir.clone(),
            github_ref: self.github_ref.clone(),
            github_event_name: self.github_event_name.to_string(),
            version: self.version().ok(),
            tag: self.tag().to_string(),
            branch: self.branch().to_string(),
            platform_tag: self.platform_tag().ok().map(String::from),
            release_dir: self.release_dir(),
            build_dir: self.build_dir(),
            dist_dir: self.dist_dir(),
            bdists: self.bdists(),
            upload_dir: self.upload_dir().ok(),
            docker_tag: self.docker_tag().ok(),
            is_pull_request: self.is_pull_request(),
            is_prod_release: self.is_prod_release(),
            is_maintenance_branch: self.is_maintenance_branch(),
            should_build_wheel: self.should_build_wheel,
            should_build_pyinstaller: self.should_build_pyinstaller,
            should_build_docker: self.should_build_docker,
            has_docker_creds: self.has_docker_creds(),
            has_aws_creds: self.has_aws_creds,
            has_twine_creds: self.has_twine_creds,
            should_upload_aws: self.should_upload_aws(),
            should_upload_docker: self.should_upload_docker(),
            should_upload_pypi: self.should_upload_pypi(),
        }
    }

    /// Write one `cibuild.<name>=<value>` line per field to `out`.
    ///
    /// Values that fail to derive are written as `<error: ...>` so the
    /// dump is complete even for a misconfigured environment.
    pub fn dump_info(&self, out: &mut dyn Write) -> Result<()> {
        let lines: Vec<(&str, String)> = vec![
            ("system", self.system.to_string()),
            ("root_dir", self.root_dir.display().to_string()),
            ("github_ref", self.github_ref.clone()),
            ("github_event_name", self.github_event_name.to_string()),
            ("version", render(self.version())),
            ("tag", self.tag().to_string()),
            ("branch", self.branch().to_string()),
            ("platform_tag", render(self.platform_tag())),
            ("release_dir", self.release_dir().display().to_string()),
            ("build_dir", self.build_dir().display().to_string()),
            ("dist_dir", self.dist_dir().display().to_string()),
            ("bdists", format!("{:?}", self.bdists())),
            ("upload_dir", render(self.upload_dir())),
            ("docker_tag", render(self.docker_tag())),
            ("is_pull_request", self.is_pull_request().to_string()),
            ("is_prod_release", self.is_prod_release().to_string()),
            ("is_maintenance_branch", self.is_maintenance_branch().to_string()),
            ("should_build_wheel", self.should_build_wheel.to_string()),
            ("should_build_pyinstaller", self.should_build_pyinstaller.to_string()),
            ("should_build_docker", self.should_build_docker.to_string()),
            ("has_docker_creds", self.has_docker_creds().to_string()),
            ("has_aws_creds", self.has_aws_creds.to_string()),
            ("has_twine_creds", self.has_twine_creds.to_string()),
            ("should_upload_aws", self.should_upload_aws().to_string()),
            ("should_upload_docker", self.should_upload_docker().to_string()),
            ("should_upload_pypi", self.should_upload_pypi().to_string()),
        ];

        for (name, value) in lines {
            writeln!(out, "cibuild.{}={}", name, value)?;
        }
        Ok(())
    }
}

fn render<T: ToString>(value: Result<T>) -> String {
    match value {
        Ok(v) => v.to_string(),
        Err(e) => format!("<error: {}>", e),
    }
}
