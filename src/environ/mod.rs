//! The build environment snapshot and the release decisions derived from it.
//!
//! [`BuildEnviron`] is an immutable snapshot of the CI facts that matter for
//! a release: host platform, repository root, git ref, event name, build
//! switches and which credentials are present. Everything else (version,
//! upload targets, docker tag, archive names) is computed from it on each
//! call.
//!
//! Reading the process environment is confined to [`source`]; the
//! snapshot itself never touches global state after construction.
//!
//! # Example
//!
//! ```
//! use cibuild::environ::{BuildEnviron, EventName, System};
//!
//! let env = BuildEnviron::builder()
//!     .system(System::Linux)
//!     .root_dir("/repo")
//!     .github_ref("refs/heads/master")
//!     .github_event_name(EventName::Push)
//!     .should_build_docker(true)
//!     .docker_credentials("user", "secret")
//!     .build();
//!
//! assert_eq!(env.branch(), "master");
//! assert_eq!(env.docker_tag().unwrap(), "mitmproxy/mitmproxy:dev");
//! assert!(env.should_upload_docker());
//! ```

pub mod archive;
pub mod info;
pub mod source;
pub mod system;
pub mod version;

pub use archive::{Archive, ArchiveFormat};
pub use info::EnvironInfo;
pub use source::{bool_from_env, bool_from_lookup, parse_bool};
pub use system::System;

use std::collections::BTreeMap;
use std::env::VarError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::{detect_project_root, load_release_config, ReleaseConfig};
use crate::error::{BuildError, Result};

const HEADS_PREFIX: &str = "refs/heads/";
const TAGS_PREFIX: &str = "refs/tags/";

/// Maintenance branches are named like `v2.x`.
static MAINTENANCE_BRANCH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v\d+\.x$").expect("MAINTENANCE_BRANCH_REGEX must compile")
});

/// The CI event that triggered the build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EventName {
    Push,
    PullRequest,
    Schedule,
    Other(String),
    #[default]
    Empty,
}

impl EventName {
    pub fn parse(name: &str) -> Self {
        match name {
            "" => EventName::Empty,
            "push" => EventName::Push,
            "pull_request" => EventName::PullRequest,
            "schedule" => EventName::Schedule,
            other => EventName::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventName::Push => "push",
            EventName::PullRequest => "pull_request",
            EventName::Schedule => "schedule",
            EventName::Other(name) => name,
            EventName::Empty => "",
        }
    }
}

impl From<&str> for EventName {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of the CI environment.
#[derive(Clone)]
pub struct BuildEnviron {
    system: System,
    root_dir: PathBuf,
    github_ref: String,
    github_event_name: EventName,
    should_build_wheel: bool,
    should_build_pyinstaller: bool,
    should_build_docker: bool,
    docker_username: String,
    docker_password: String,
    has_aws_creds: bool,
    has_twine_creds: bool,
    config: ReleaseConfig,
}

impl BuildEnviron {
    /// Start building a snapshot from explicit values.
    pub fn builder() -> BuildEnvironBuilder {
        BuildEnvironBuilder::default()
    }

    /// Snapshot the live process environment.
    ///
    /// The repository root is the nearest ancestor of the current directory
    /// containing `.git`; its `release/cibuild.yml` is loaded if present.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(source::process_env)
    }

    /// Same as [`from_env`](Self::from_env) over an injected variable lookup.
    pub fn from_env_with<F>(env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let root = detect_project_root()?;
        let config = load_release_config(&root)?;

        Ok(BuildEnvironBuilder::from_lookup(env_fn)
            .root_dir(root)
            .config(config)
            .build())
    }

    // --- Snapshot fields ---

    pub fn system(&self) -> System {
        self.system
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn github_ref(&self) -> &str {
        &self.github_ref
    }

    pub fn github_event_name(&self) -> &EventName {
        &self.github_event_name
    }

    pub fn should_build_wheel(&self) -> bool {
        self.should_build_wheel
    }

    pub fn should_build_pyinstaller(&self) -> bool {
        self.should_build_pyinstaller
    }

    pub fn should_build_docker(&self) -> bool {
        self.should_build_docker
    }

    /// Both docker username and password are set.
    pub fn has_docker_creds(&self) -> bool {
        !self.docker_username.is_empty() && !self.docker_password.is_empty()
    }

    pub fn has_aws_creds(&self) -> bool {
        self.has_aws_creds
    }

    pub fn has_twine_creds(&self) -> bool {
        self.has_twine_creds
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    // --- Ref classification ---

    /// Branch name, or empty when the ref is not a branch.
    pub fn branch(&self) -> &str {
        self.github_ref.strip_prefix(HEADS_PREFIX).unwrap_or("")
    }

    /// Tag name, or empty when the ref is not a tag.
    pub fn tag(&self) -> &str {
        self.github_ref.strip_prefix(TAGS_PREFIX).unwrap_or("")
    }

    pub fn is_pull_request(&self) -> bool {
        self.github_event_name == EventName::PullRequest
    }

    pub fn is_push(&self) -> bool {
        self.github_event_name == EventName::Push
    }

    pub fn is_maintenance_branch(&self) -> bool {
        MAINTENANCE_BRANCH_REGEX.is_match(self.branch())
    }

    fn is_default_branch(&self) -> bool {
        !self.branch().is_empty() && self.branch() == self.config.default_branch
    }

    /// Version string for this build.
    ///
    /// A tag wins (with one leading `v` removed), then the branch name.
    pub fn version(&self) -> Result<String> {
        let tag = self.tag();
        if !tag.is_empty() {
            return Ok(tag.strip_prefix('v').unwrap_or(tag).to_string());
        }

        let branch = self.branch();
        if !branch.is_empty() {
            return Ok(branch.to_string());
        }

        Err(BuildError::environment(
            "We're on neither a tag nor a branch - could not establish version",
        ))
    }

    /// Directory on the artifact host that this build uploads into.
    pub fn upload_dir(&self) -> Result<String> {
        if !self.tag().is_empty() {
            return self.version();
        }

        let branch = self.branch();
        if !branch.is_empty() {
            return Ok(format!("branches/{}", branch));
        }

        Err(BuildError::environment(
            "We're on neither a tag nor a branch - could not establish upload directory",
        ))
    }

    /// Version declared in the project's version file.
    pub fn declared_version(&self) -> Result<String> {
        version::read_declared_version(&self.root_dir, &self.config.version_file)
    }

    /// A `v`-tagged build of exactly the declared, non-dev version.
    pub fn is_prod_release(&self) -> bool {
        let Some(tagged) = self.tag().strip_prefix('v') else {
            return false;
        };

        match self.declared_version() {
            Ok(declared) => tagged == declared && version::is_release_version(&declared),
            Err(e) => {
                tracing::debug!("Not a production release: {}", e);
                false
            }
        }
    }

    /// Check the declared version against the tag conventions.
    ///
    /// # Errors
    ///
    /// Returns `Validation` on any mismatch, including an unreadable
    /// version file.
    pub fn check_version(&self) -> Result<()> {
        let declared = self.declared_version()?;
        version::validate_tag(self.tag(), &declared)?;
        tracing::debug!(tag = self.tag(), declared = %declared, "version check passed");
        Ok(())
    }

    // --- Layout ---

    pub fn release_dir(&self) -> PathBuf {
        self.root_dir.join("release")
    }

    pub fn dist_dir(&self) -> PathBuf {
        self.release_dir().join("dist")
    }

    pub fn build_dir(&self) -> PathBuf {
        self.release_dir().join("build")
    }

    pub fn platform_tag(&self) -> Result<&'static str> {
        self.system.platform_tag()
    }

    /// Bundles and the executables each contains, for this platform.
    ///
    /// Console-only tools are left out on Windows.
    pub fn bdists(&self) -> BTreeMap<String, Vec<String>> {
        self.config
            .bundles
            .iter()
            .map(|(bundle, tools)| {
                let tools = tools
                    .iter()
                    .filter(|tool| {
                        !(self.system.is_windows() && self.config.console_tools.contains(tool))
                    })
                    .cloned()
                    .collect();
                (bundle.clone(), tools)
            })
            .collect()
    }

    /// File name for a bundle archive, e.g. `mitmproxy-0.0.1-osx.tar.gz`.
    pub fn archive_name(&self, bundle: &str) -> Result<String> {
        Ok(format!(
            "{}-{}-{}.{}",
            bundle,
            self.version()?,
            self.platform_tag()?,
            self.system.archive_extension()
        ))
    }

    /// Open an archive writer at `path` in this platform's format.
    ///
    /// The caller owns the handle and should [`finish`](Archive::finish) it.
    pub fn archive(&self, path: &Path) -> Result<Archive> {
        Archive::create(path, ArchiveFormat::for_system(self.system))
    }

    // --- Upload decisions ---

    /// Docker image reference, `dev` for pushes to the development branch.
    pub fn docker_tag(&self) -> Result<String> {
        let suffix = if self.is_push() && self.tag().is_empty() && self.is_default_branch() {
            "dev".to_string()
        } else {
            self.version()?
        };
        Ok(format!("{}:{}", self.config.docker_repository, suffix))
    }

    /// Shared trigger for docker and AWS uploads.
    ///
    /// Pull requests never upload. A production release uploads on any
    /// event; otherwise only pushes to the development branch or to a
    /// maintenance branch do.
    fn is_upload_trigger(&self) -> bool {
        if self.is_pull_request() {
            return false;
        }
        if self.is_prod_release() {
            return true;
        }
        self.is_push() && (self.is_default_branch() || self.is_maintenance_branch())
    }

    pub fn should_upload_pypi(&self) -> bool {
        self.should_build_wheel && self.is_prod_release() && self.has_twine_creds
    }

    pub fn should_upload_docker(&self) -> bool {
        self.should_build_docker && self.has_docker_creds() && self.is_upload_trigger()
    }

    pub fn should_upload_aws(&self) -> bool {
        self.should_build_pyinstaller && self.has_aws_creds && self.is_upload_trigger()
    }
}

impl fmt::Debug for BuildEnviron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildEnviron")
            .field("system", &self.system)
            .field("root_dir", &self.root_dir)
            .field("github_ref", &self.github_ref)
            .field("github_event_name", &self.github_event_name)
            .field("should_build_wheel", &self.should_build_wheel)
            .field("should_build_pyinstaller", &self.should_build_pyinstaller)
            .field("should_build_docker", &self.should_build_docker)
            .field("has_docker_creds", &self.has_docker_creds())
            .field("has_aws_creds", &self.has_aws_creds)
            .field("has_twine_creds", &self.has_twine_creds)
            .finish_non_exhaustive()
    }
}

/// Builder for [`BuildEnviron`].
///
/// Every field defaults to "absent": empty ref, event and credentials,
/// all build switches off, the host platform, and the repository root
/// containing the current directory.
#[derive(Clone)]
pub struct BuildEnvironBuilder {
    system: System,
    root_dir: Option<PathBuf>,
    github_ref: String,
    github_event_name: EventName,
    should_build_wheel: bool,
    should_build_pyinstaller: bool,
    should_build_docker: bool,
    docker_username: String,
    docker_password: String,
    has_aws_creds: bool,
    has_twine_creds: bool,
    config: ReleaseConfig,
}

impl Default for BuildEnvironBuilder {
    fn default() -> Self {
        Self {
            system: System::current(),
            root_dir: None,
            github_ref: String::new(),
            github_event_name: EventName::Empty,
            should_build_wheel: false,
            should_build_pyinstaller: false,
            should_build_docker: false,
            docker_username: String::new(),
            docker_password: String::new(),
            has_aws_creds: false,
            has_twine_creds: false,
            config: ReleaseConfig::default(),
        }
    }
}

impl BuildEnvironBuilder {
    /// Fill the environment-derived fields through a lookup function.
    ///
    /// `root_dir` and `config` are left for the caller.
    pub fn from_lookup<F>(env_fn: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<String, VarError>,
    {
        let flag = |name: &str| source::bool_from_lookup(name, &env_fn);
        let text = |name: &str| source::string_from_lookup(name, &env_fn);

        let builder = Self {
            system: System::current(),
            github_ref: text("GITHUB_REF"),
            github_event_name: EventName::parse(&text("GITHUB_EVENT_NAME")),
            should_build_wheel: flag("CI_BUILD_WHEEL"),
            should_build_pyinstaller: flag("CI_BUILD_PYINSTALLER"),
            should_build_docker: flag("CI_BUILD_DOCKER"),
            docker_username: text("DOCKER_USERNAME"),
            docker_password: text("DOCKER_PASSWORD"),
            has_aws_creds: flag("AWS_ACCESS_KEY_ID"),
            has_twine_creds: flag("TWINE_USERNAME") && flag("TWINE_PASSWORD"),
            ..Self::default()
        };

        tracing::debug!(
            github_ref = %builder.github_ref,
            event = %builder.github_event_name,
            "read CI environment"
        );
        builder
    }

    pub fn system(mut self, system: System) -> Self {
        self.system = system;
        self
    }

    pub fn root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    pub fn github_ref(mut self, github_ref: impl Into<String>) -> Self {
        self.github_ref = github_ref.into();
        self
    }

    pub fn github_event_name(mut self, event: impl Into<EventName>) -> Self {
        self.github_event_name = event.into();
        self
    }

    pub fn should_build_wheel(mut self, value: bool) -> Self {
        self.should_build_wheel = value;
        self
    }

    pub fn should_build_pyinstaller(mut self, value: bool) -> Self {
        self.should_build_pyinstaller = value;
        self
    }

    pub fn should_build_docker(mut self, value: bool) -> Self {
        self.should_build_docker = value;
        self
    }

    pub fn docker_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.docker_username = username.into();
        self.docker_password = password.into();
        self
    }

    pub fn has_aws_creds(mut self, value: bool) -> Self {
        self.has_aws_creds = value;
        self
    }

    pub fn has_twine_creds(mut self, value: bool) -> Self {
        self.has_twine_creds = value;
        self
    }

    pub fn config(mut self, config: ReleaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> BuildEnviron {
        let root_dir = self.root_dir.unwrap_or_else(default_root_dir);

        BuildEnviron {
            system: self.system,
            root_dir,
            github_ref: self.github_ref,
            github_event_name: self.github_event_name,
            should_build_wheel: self.should_build_wheel,
            should_build_pyinstaller: self.should_build_pyinstaller,
            should_build_docker: self.should_build_docker,
            docker_username: self.docker_username,
            docker_password: self.docker_password,
            has_aws_creds: self.has_aws_creds,
            has_twine_creds: self.has_twine_creds,
            config: self.config,
        }
    }
}

fn default_root_dir() -> PathBuf {
    detect_project_root().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Repository root with a version declaration.
    fn repo_with_version(version: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("mitmproxy")).unwrap();
        fs::write(
            temp.path().join("mitmproxy/version.py"),
            format!("VERSION = \"{}\"\n", version),
        )
        .unwrap();
        temp
    }

    fn make_env(vars: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, VarError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn from_env_with_reads_lookup() {
        let env = BuildEnviron::from_env_with(make_env(&[
            ("GITHUB_REF", "refs/heads/v3.x"),
            ("GITHUB_EVENT_NAME", "push"),
            ("CI_BUILD_PYINSTALLER", "true"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
        ]))
        .unwrap();

        assert_eq!(env.branch(), "v3.x");
        assert!(env.is_push());
        assert!(env.should_upload_aws());
    }

    #[test]
    fn common_layout() {
        let env = BuildEnviron::builder()
            .system(System::Linux)
            .root_dir("/foo")
            .github_ref("refs/heads/master")
            .build();

        assert_eq!(env.release_dir(), Path::new("/foo").join("release"));
        assert_eq!(env.dist_dir(), Path::new("/foo").join("release").join("dist"));
        assert_eq!(env.build_dir(), Path::new("/foo").join("release").join("build"));
        assert!(!env.is_pull_request());
        assert!(!env.has_docker_creds());
    }

    #[test]
    fn unknown_system_without_ref_fails() {
        let env = BuildEnviron::builder()
            .system(System::Unknown)
            .root_dir("/foo")
            .build();

        assert!(matches!(env.version(), Err(BuildError::Environment { .. })));
        assert!(matches!(env.platform_tag(), Err(BuildError::Environment { .. })));
        assert!(matches!(env.upload_dir(), Err(BuildError::Environment { .. })));
    }

    #[test]
    fn pull_request_depends_only_on_event() {
        for github_ref in ["", "refs/heads/master", "refs/tags/qux", "refs/pull/1/merge"] {
            let pr = BuildEnviron::builder()
                .github_ref(github_ref)
                .github_event_name("pull_request")
                .build();
            assert!(pr.is_pull_request(), "{github_ref}");

            let push = BuildEnviron::builder()
                .github_ref(github_ref)
                .github_event_name("push")
                .build();
            assert!(!push.is_pull_request(), "{github_ref}");
        }
    }

    #[test]
    fn ref_shapes() {
        let branch = BuildEnviron::builder()
            .github_event_name(EventName::PullRequest)
            .github_ref("refs/heads/master")
            .build();
        assert_eq!(branch.branch(), "master");
        assert_eq!(branch.tag(), "");

        let tag = BuildEnviron::builder()
            .github_event_name(EventName::PullRequest)
            .github_ref("refs/tags/qux")
            .build();
        assert_eq!(tag.branch(), "");
        assert_eq!(tag.tag(), "qux");

        let other = BuildEnviron::builder().github_ref("refs/pull/7/merge").build();
        assert_eq!(other.branch(), "");
        assert_eq!(other.tag(), "");
    }

    #[test]
    fn branch_names_keep_slashes() {
        let env = BuildEnviron::builder()
            .github_ref("refs/heads/feature/login")
            .build();
        assert_eq!(env.branch(), "feature/login");
        assert_eq!(env.upload_dir().unwrap(), "branches/feature/login");
    }

    #[test]
    fn commit_on_default_branch() {
        let env = BuildEnviron::builder()
            .root_dir("/foo")
            .github_ref("refs/heads/master")
            .github_event_name(EventName::Push)
            .should_build_wheel(true)
            .should_build_pyinstaller(true)
            .should_build_docker(true)
            .docker_credentials("foo", "bar")
            .has_aws_creds(true)
            .build();

        assert_eq!(env.docker_tag().unwrap(), "mitmproxy/mitmproxy:dev");
        assert!(env.should_upload_docker());
        assert!(!env.should_upload_pypi());
        assert!(env.should_upload_aws());
        assert!(!env.is_prod_release());
        assert!(!env.is_maintenance_branch());
    }

    #[test]
    fn release_tag() {
        let repo = repo_with_version("0.0.1");
        let env = BuildEnviron::builder()
            .system(System::Linux)
            .root_dir(repo.path())
            .github_ref("refs/tags/v0.0.1")
            .should_build_wheel(true)
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .has_twine_creds(true)
            .docker_credentials("foo", "bar")
            .build();

        assert_eq!(env.tag(), "v0.0.1");
        assert_eq!(env.branch(), "");
        assert_eq!(env.version().unwrap(), "0.0.1");
        assert_eq!(env.upload_dir().unwrap(), "0.0.1");
        assert_eq!(env.docker_tag().unwrap(), "mitmproxy/mitmproxy:0.0.1");
        assert!(env.should_upload_pypi());
        assert!(env.should_upload_docker());
        assert!(env.is_prod_release());
        assert!(!env.is_maintenance_branch());
        env.check_version().unwrap();
    }

    #[test]
    fn pypi_upload_needs_wheel_and_twine_creds() {
        let repo = repo_with_version("1.0.0");
        let base = || {
            BuildEnviron::builder()
                .system(System::Linux)
                .root_dir(repo.path())
                .github_ref("refs/tags/v1.0.0")
                .github_event_name(EventName::Push)
                .should_build_wheel(true)
                .has_twine_creds(true)
        };

        assert!(base().build().is_prod_release());
        assert!(base().build().should_upload_pypi());
        assert!(!base().has_twine_creds(false).build().should_upload_pypi());
        assert!(!base().should_build_wheel(false).build().should_upload_pypi());
    }

    #[test]
    fn release_tag_without_version_file_is_not_prod() {
        let temp = TempDir::new().unwrap();
        let env = BuildEnviron::builder()
            .root_dir(temp.path())
            .github_ref("refs/tags/v0.0.1")
            .should_build_wheel(true)
            .has_twine_creds(true)
            .build();

        assert!(!env.is_prod_release());
        assert!(!env.should_upload_pypi());
        assert!(env.check_version().unwrap_err().is_validation());
    }

    #[test]
    fn release_tag_with_stale_dev_marker_is_not_prod() {
        let repo = repo_with_version("0.0.1.dev");
        let env = BuildEnviron::builder()
            .root_dir(repo.path())
            .github_ref("refs/tags/v0.0.1.dev")
            .build();

        assert!(!env.is_prod_release());
    }

    #[test]
    fn named_tag() {
        let repo = repo_with_version("3.0.0.dev");
        let env = BuildEnviron::builder()
            .system(System::Linux)
            .root_dir(repo.path())
            .github_ref("refs/tags/anyname")
            .should_build_wheel(true)
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .has_twine_creds(true)
            .docker_credentials("foo", "bar")
            .build();

        assert_eq!(env.tag(), "anyname");
        assert_eq!(env.branch(), "");
        assert_eq!(env.version().unwrap(), "anyname");
        assert_eq!(env.upload_dir().unwrap(), "anyname");
        assert_eq!(env.docker_tag().unwrap(), "mitmproxy/mitmproxy:anyname");
        assert!(!env.should_upload_pypi());
        assert!(!env.should_upload_docker());
        assert!(!env.is_prod_release());
        assert!(!env.is_maintenance_branch());
        env.check_version().unwrap();
    }

    #[test]
    fn dev_branch() {
        let env = BuildEnviron::builder()
            .system(System::Linux)
            .root_dir("/foo")
            .github_ref("refs/heads/mybranch")
            .should_build_wheel(true)
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .has_twine_creds(true)
            .docker_credentials("foo", "bar")
            .build();

        assert_eq!(env.tag(), "");
        assert_eq!(env.branch(), "mybranch");
        assert_eq!(env.version().unwrap(), "mybranch");
        assert_eq!(env.upload_dir().unwrap(), "branches/mybranch");
        assert!(!env.should_upload_pypi());
        assert!(!env.should_upload_docker());
        assert!(!env.is_maintenance_branch());
    }

    #[test]
    fn maintenance_branch() {
        let env = BuildEnviron::builder()
            .system(System::Linux)
            .root_dir("/foo")
            .github_ref("refs/heads/v0.x")
            .should_build_wheel(true)
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .has_twine_creds(true)
            .docker_credentials("foo", "bar")
            .build();

        assert_eq!(env.tag(), "");
        assert_eq!(env.branch(), "v0.x");
        assert_eq!(env.version().unwrap(), "v0.x");
        assert_eq!(env.upload_dir().unwrap(), "branches/v0.x");
        assert!(!env.should_upload_pypi());
        assert!(!env.should_upload_docker());
        assert!(env.is_maintenance_branch());
    }

    #[test]
    fn push_to_maintenance_branch_uploads() {
        let env = BuildEnviron::builder()
            .root_dir("/foo")
            .github_ref("refs/heads/v12.x")
            .github_event_name(EventName::Push)
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .docker_credentials("foo", "bar")
            .has_aws_creds(true)
            .build();

        assert!(env.is_maintenance_branch());
        assert!(env.should_upload_docker());
        assert!(env.should_upload_aws());
        assert_eq!(env.docker_tag().unwrap(), "mitmproxy/mitmproxy:v12.x");
    }

    #[test]
    fn maintenance_branch_pattern() {
        for (branch, expected) in [
            ("v0.x", true),
            ("v12.x", true),
            ("v1.2.x", false),
            ("vX.x", false),
            ("0.x", false),
            ("v1.xx", false),
        ] {
            let env = BuildEnviron::builder()
                .github_ref(format!("refs/heads/{}", branch))
                .build();
            assert_eq!(env.is_maintenance_branch(), expected, "{branch}");
        }

        let tag = BuildEnviron::builder().github_ref("refs/tags/v0.x").build();
        assert!(!tag.is_maintenance_branch());
    }

    #[test]
    fn push_and_prod_release_trigger_independently() {
        let repo = repo_with_version("1.0.0");
        let base = || {
            BuildEnviron::builder()
                .root_dir(repo.path())
                .should_build_docker(true)
                .should_build_pyinstaller(true)
                .docker_credentials("foo", "bar")
                .has_aws_creds(true)
        };

        // Push to the default branch, not a release.
        let push = base()
            .github_ref("refs/heads/master")
            .github_event_name(EventName::Push)
            .build();
        assert!(!push.is_prod_release());
        assert!(push.should_upload_docker());
        assert!(push.should_upload_aws());

        // Release tag without a push event.
        let release = base().github_ref("refs/tags/v1.0.0").build();
        assert!(release.is_prod_release());
        assert!(release.should_upload_docker());
        assert!(release.should_upload_aws());

        // Release tag pushed: both conditions hold.
        let both = base()
            .github_ref("refs/tags/v1.0.0")
            .github_event_name(EventName::Push)
            .build();
        assert!(both.is_prod_release());
        assert!(both.should_upload_docker());
        assert!(both.should_upload_aws());
        assert_eq!(both.docker_tag().unwrap(), "mitmproxy/mitmproxy:1.0.0");

        // Neither condition.
        let neither = base().github_ref("refs/heads/master").build();
        assert!(!neither.should_upload_docker());
        assert!(!neither.should_upload_aws());
    }

    #[test]
    fn pull_request_never_uploads() {
        let repo = repo_with_version("1.0.0");
        let env = BuildEnviron::builder()
            .root_dir(repo.path())
            .github_ref("refs/tags/v1.0.0")
            .github_event_name(EventName::PullRequest)
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .docker_credentials("foo", "bar")
            .has_aws_creds(true)
            .build();

        assert!(env.is_pull_request());
        assert!(!env.should_upload_docker());
        assert!(!env.should_upload_aws());
    }

    #[test]
    fn uploads_require_build_switch_and_credentials() {
        let base = || {
            BuildEnviron::builder()
                .root_dir("/foo")
                .github_ref("refs/heads/master")
                .github_event_name(EventName::Push)
        };

        let no_creds = base()
            .should_build_docker(true)
            .should_build_pyinstaller(true)
            .build();
        assert!(!no_creds.should_upload_docker());
        assert!(!no_creds.should_upload_aws());

        let half_creds = base()
            .should_build_docker(true)
            .docker_credentials("foo", "")
            .build();
        assert!(!half_creds.has_docker_creds());
        assert!(!half_creds.should_upload_docker());

        let not_built = base()
            .docker_credentials("foo", "bar")
            .has_aws_creds(true)
            .build();
        assert!(!not_built.should_upload_docker());
        assert!(!not_built.should_upload_aws());
    }

    #[test]
    fn docker_dev_tag_only_on_push() {
        let env = BuildEnviron::builder()
            .github_ref("refs/heads/master")
            .github_event_name(EventName::Schedule)
            .build();
        assert_eq!(env.docker_tag().unwrap(), "mitmproxy/mitmproxy:master");
    }

    #[test]
    fn default_branch_comes_from_config() {
        let config = ReleaseConfig {
            default_branch: "main".to_string(),
            docker_repository: "example/proxy".to_string(),
            ..ReleaseConfig::default()
        };
        let env = BuildEnviron::builder()
            .github_ref("refs/heads/main")
            .github_event_name(EventName::Push)
            .config(config)
            .build();
        assert_eq!(env.docker_tag().unwrap(), "example/proxy:dev");
    }

    #[test]
    fn osx_bundles() {
        let temp = TempDir::new().unwrap();
        let env = BuildEnviron::builder()
            .system(System::Darwin)
            .root_dir("/foo")
            .github_ref("refs/tags/v0.0.1")
            .build();

        assert_eq!(env.platform_tag().unwrap(), "osx");
        let bdists = env.bdists();
        assert_eq!(bdists.len(), 1);
        assert_eq!(bdists["mitmproxy"], vec!["mitmproxy", "mitmdump", "mitmweb"]);
        assert_eq!(
            env.archive_name("mitmproxy").unwrap(),
            "mitmproxy-0.0.1-osx.tar.gz"
        );

        let archive = env.archive(&temp.path().join("arch")).unwrap();
        assert_eq!(archive.format(), ArchiveFormat::TarGz);
        archive.finish().unwrap();
    }

    #[test]
    fn windows_bundles() {
        let temp = TempDir::new().unwrap();
        let env = BuildEnviron::builder()
            .system(System::Windows)
            .root_dir("/foo")
            .github_ref("refs/tags/v0.0.1")
            .build();

        assert_eq!(env.platform_tag().unwrap(), "windows");
        let bdists = env.bdists();
        assert_eq!(bdists.len(), 1);
        assert_eq!(bdists["mitmproxy"], vec!["mitmdump", "mitmweb"]);
        assert_eq!(
            env.archive_name("mitmproxy").unwrap(),
            "mitmproxy-0.0.1-windows.zip"
        );

        let archive = env.archive(&temp.path().join("arch")).unwrap();
        assert_eq!(archive.format(), ArchiveFormat::Zip);
        archive.finish().unwrap();
    }

    #[test]
    fn archive_name_needs_platform_and_version() {
        let unknown = BuildEnviron::builder()
            .system(System::Unknown)
            .github_ref("refs/tags/v1.0")
            .build();
        assert!(unknown.archive_name("mitmproxy").is_err());

        let no_ref = BuildEnviron::builder().system(System::Linux).build();
        assert!(no_ref.archive_name("mitmproxy").is_err());
    }

    #[test]
    fn check_version_table() {
        let cases = [
            ("3.0.0.dev", "", true),
            ("3.0.0.dev", "v3.0.0", false),
            ("3.0.0", "", false),
            ("3.0.0", "v4.0.0", false),
            ("3.0.0", "v3.0.0", true),
            ("3.0.0.rc1", "v3.0.0.rc1", false),
            ("3.0.0.dev", "anyname", true),
            ("3.0.0", "3.0.0", false),
        ];

        for (declared, tag, ok) in cases {
            let repo = repo_with_version(declared);
            let env = BuildEnviron::builder()
                .root_dir(repo.path())
                .github_ref(format!("refs/tags/{}", tag))
                .build();

            let result = env.check_version();
            assert_eq!(result.is_ok(), ok, "declared={declared:?} tag={tag:?}");
            if let Err(err) = result {
                assert!(err.is_validation(), "{err}");
            }
        }
    }

    #[test]
    fn ad_hoc_tag_is_never_prod() {
        let repo = repo_with_version("3.0.0.dev");
        let env = BuildEnviron::builder()
            .root_dir(repo.path())
            .github_ref("refs/tags/anyname")
            .build();
        env.check_version().unwrap();
        assert!(!env.is_prod_release());
    }

    #[test]
    fn check_version_reads_configured_file() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("VERSION.txt"), "VERSION = \"2.1.0\"").unwrap();
        let config = ReleaseConfig {
            version_file: PathBuf::from("VERSION.txt"),
            ..ReleaseConfig::default()
        };
        let env = BuildEnviron::builder()
            .root_dir(temp.path())
            .github_ref("refs/tags/v2.1.0")
            .config(config)
            .build();

        env.check_version().unwrap();
        assert!(env.is_prod_release());
    }

    #[test]
    fn from_lookup_reads_ci_variables() {
        let env = BuildEnvironBuilder::from_lookup(make_env(&[
            ("GITHUB_REF", "refs/heads/master"),
            ("GITHUB_EVENT_NAME", "push"),
            ("CI_BUILD_WHEEL", "1"),
            ("CI_BUILD_PYINSTALLER", "false"),
            ("CI_BUILD_DOCKER", "true"),
            ("DOCKER_USERNAME", "foo"),
            ("DOCKER_PASSWORD", "bar"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("TWINE_USERNAME", "user"),
        ]))
        .system(System::Linux)
        .root_dir("/foo")
        .build();

        assert_eq!(env.branch(), "master");
        assert!(env.is_push());
        assert!(env.should_build_wheel());
        assert!(!env.should_build_pyinstaller());
        assert!(env.should_build_docker());
        assert!(env.has_docker_creds());
        assert!(env.has_aws_creds());
        // TWINE_PASSWORD missing
        assert!(!env.has_twine_creds());
    }

    #[test]
    fn from_lookup_with_empty_environment() {
        let env = BuildEnvironBuilder::from_lookup(make_env(&[]))
            .root_dir("/foo")
            .build();

        assert_eq!(env.github_ref(), "");
        assert_eq!(env.github_event_name(), &EventName::Empty);
        assert!(!env.should_build_wheel());
        assert!(!env.has_docker_creds());
        assert!(!env.has_aws_creds());
        assert!(!env.has_twine_creds());
        assert_eq!(env.system(), System::current());
    }

    #[test]
    fn from_env_snapshots_live_environment() {
        let env = BuildEnviron::from_env().unwrap();
        assert!(env.release_dir().ends_with("release"));
    }

    #[test]
    fn event_name_parsing() {
        assert_eq!(EventName::parse("push"), EventName::Push);
        assert_eq!(EventName::parse("pull_request"), EventName::PullRequest);
        assert_eq!(EventName::parse("schedule"), EventName::Schedule);
        assert_eq!(EventName::parse(""), EventName::Empty);
        assert_eq!(
            EventName::parse("workflow_dispatch"),
            EventName::Other("workflow_dispatch".to_string())
        );
        assert_eq!(EventName::parse("workflow_dispatch").to_string(), "workflow_dispatch");
    }

    #[test]
    fn debug_output_hides_docker_password() {
        let env = BuildEnviron::builder()
            .docker_credentials("foo", "hunter2")
            .build();
        let debug = format!("{:?}", env);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("has_docker_creds: true"));
    }
}
