//! The `cyano.toml` project manifest.
//!
//! Only `[project]` is required. Every other table falls back to the values
//! the cyano library has historically been built with.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::channel::{ChannelPolicy, ChannelRule};
use crate::coordinate::Coordinate;
use crate::error::ManifestError;
use crate::version::VersionId;

pub const DEFAULT_MANIFEST: &str = "cyano.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectManifest {
    pub project: ProjectSection,
    #[serde(default)]
    pub versions: BTreeMap<String, String>,
    #[serde(default)]
    pub libraries: BTreeMap<String, LibrarySpec>,
    #[serde(default)]
    pub dependencies: DependencySection,
    #[serde(default)]
    pub repositories: RepositorySection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub publishing: PublishingSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One `[libraries]` entry. Either `module = "group:name"` or separate
/// `group`/`name` keys, with a literal `version` or a `version-ref`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LibrarySpec {
    pub module: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    pub version: Option<String>,
    pub version_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DependencySection {
    #[serde(default)]
    pub api: Vec<String>,
    #[serde(default)]
    pub compile_only: Vec<String>,
    #[serde(default)]
    pub test: Vec<String>,
    #[serde(default)]
    pub test_runtime_only: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositorySection {
    #[serde(default = "default_resolve_repositories")]
    pub resolve: Vec<String>,
}

impl Default for RepositorySection {
    fn default() -> Self {
        Self {
            resolve: default_resolve_repositories(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildSection {
    #[serde(default = "default_compile_command")]
    pub compile: Vec<String>,
    #[serde(default = "default_test_command")]
    pub test: Vec<String>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_jvm_args_env")]
    pub jvm_args_env: String,
    #[serde(default = "default_true")]
    pub sources: bool,
    #[serde(default = "default_true")]
    pub javadoc: bool,
    #[serde(default = "default_lock_file")]
    pub lock_file: PathBuf,
    #[serde(default = "default_system_properties")]
    pub system_properties: BTreeMap<String, String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            compile: default_compile_command(),
            test: default_test_command(),
            output_dir: default_output_dir(),
            jvm_args_env: default_jvm_args_env(),
            sources: true,
            javadoc: true,
            lock_file: default_lock_file(),
            system_properties: default_system_properties(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PublishingSection {
    #[serde(default = "default_repository_name")]
    pub name: String,
    #[serde(default = "default_snapshot_url")]
    pub snapshot_url: String,
    #[serde(default = "default_release_url")]
    pub release_url: String,
    #[serde(default = "default_username_env")]
    pub username_env: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
    #[serde(default)]
    pub channel_rule: ChannelRule,
    #[serde(default = "default_marker")]
    pub marker: String,
}

impl Default for PublishingSection {
    fn default() -> Self {
        Self {
            name: default_repository_name(),
            snapshot_url: default_snapshot_url(),
            release_url: default_release_url(),
            username_env: default_username_env(),
            password_env: default_password_env(),
            channel_rule: ChannelRule::default(),
            marker: default_marker(),
        }
    }
}

impl PublishingSection {
    pub fn channel_policy(&self) -> ChannelPolicy {
        ChannelPolicy::new(self.channel_rule, self.marker.clone())
    }
}

fn default_resolve_repositories() -> Vec<String> {
    vec!["https://repo.maven.apache.org/maven2".to_string()]
}

fn default_compile_command() -> Vec<String> {
    vec!["./gradlew".to_string(), "assemble".to_string()]
}

fn default_test_command() -> Vec<String> {
    vec!["./gradlew".to_string(), "test".to_string()]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/libs")
}

fn default_jvm_args_env() -> String {
    "JAVA_TOOL_OPTIONS".to_string()
}

fn default_true() -> bool {
    true
}

fn default_lock_file() -> PathBuf {
    PathBuf::from("cyano.lock.json")
}

fn default_system_properties() -> BTreeMap<String, String> {
    BTreeMap::from([("minestom.inside-test".to_string(), "true".to_string())])
}

fn default_repository_name() -> String {
    "OneLiteFeatherRepository".to_string()
}

fn default_snapshot_url() -> String {
    "https://repo.onelitefeather.dev/onelitefeather-snapshots".to_string()
}

fn default_release_url() -> String {
    "https://repo.onelitefeather.dev/onelitefeather-releases".to_string()
}

fn default_username_env() -> String {
    "ONELITEFEATHER_MAVEN_USERNAME".to_string()
}

fn default_password_env() -> String {
    "ONELITEFEATHER_MAVEN_PASSWORD".to_string()
}

fn default_marker() -> String {
    "SNAPSHOT".to_string()
}

impl ProjectManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let manifest: ProjectManifest = toml::from_str(content)?;
        manifest.project_coordinate()?;
        Ok(manifest)
    }

    /// Coordinate under which this project is published.
    pub fn project_coordinate(&self) -> Result<Coordinate, ManifestError> {
        Coordinate::new(
            &self.project.group,
            &self.project.name,
            &self.project.version,
        )
    }

    /// The project version, parsed. Under the substring channel rule the
    /// version does not have to parse, so callers that only route by
    /// substring should use `project.version` directly.
    pub fn version(&self) -> Result<VersionId, ManifestError> {
        Ok(VersionId::parse(&self.project.version)?)
    }
}
