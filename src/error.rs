//! Typed errors for the resolution, build, and publication stages.
//!
//! Every variant is fatal to the current invocation. Nothing in this crate
//! retries or swallows these; the CLI prints the cause chain and exits.

use std::path::PathBuf;
use thiserror::Error;

/// A version identifier that does not follow `core[-tag][+build]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("version identifier is empty")]
    Empty,

    /// The numeric core is missing or has a non-numeric component.
    #[error("invalid version {raw:?}: numeric core {core:?} must be dot-separated integers")]
    InvalidCore { raw: String, core: String },

    #[error("invalid version {raw:?}: pre-release tag {tag:?} is empty or has illegal characters")]
    InvalidTag { raw: String, tag: String },

    #[error("invalid version {raw:?}: build metadata {build:?} is empty or has illegal characters")]
    InvalidBuild { raw: String, build: String },
}

/// Problems in `cyano.toml` or in what it declares.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest")]
    Parse(#[from] toml::de::Error),

    #[error("unknown library alias {alias:?}")]
    UnknownAlias { alias: String },

    #[error("library {alias:?} references unknown version {reference:?}")]
    UnknownVersionRef { alias: String, reference: String },

    #[error("library {alias:?} is incomplete: {reason}")]
    IncompleteLibrary { alias: String, reason: String },

    #[error("invalid coordinate {value:?}: {reason}")]
    InvalidCoordinate { value: String, reason: String },

    #[error("library {alias:?} is declared twice as {visibility}")]
    DuplicateDependency { alias: String, visibility: String },

    #[error("invalid project version")]
    Version(#[from] VersionError),
}

/// A coordinate that could not be turned into a concrete artifact.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no repositories configured for dependency resolution")]
    NoRepositories,

    #[error("could not resolve {coordinate}; tried {}", .repositories.join(", "))]
    Unresolvable {
        coordinate: String,
        repositories: Vec<String>,
    },

    #[error("failed to query {url} for {coordinate}: {reason}")]
    Transport {
        coordinate: String,
        url: String,
        reason: String,
    },
}

/// An external compile or test command that did not succeed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("no command configured for the {step} step")]
    EmptyCommand { step: String },

    #[error("failed to start {program:?} for the {step} step")]
    Spawn {
        step: String,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{step} step failed: {status}")]
    Failed { step: String, status: String },
}

/// Credentials that are absent from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("environment variable {variable} is not set")]
    Missing { variable: String },

    #[error("environment variable {variable} is empty")]
    Empty { variable: String },

    #[error("environment variable {variable} is not valid unicode")]
    NotUnicode { variable: String },
}

/// Upload failures against the selected repository.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("repository rejected {url} with HTTP {status}")]
    Rejected { url: String, status: u16 },

    #[error("upload to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("failed to read artifact {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid version for publication")]
    Version(#[from] VersionError),
}
