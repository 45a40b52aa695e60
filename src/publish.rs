//! Uploading a finished artifact set to exactly one repository.
//!
//! The repository is chosen from the version by [`ChannelPolicy`]. A
//! failed upload aborts the publish; nothing falls back to the other
//! channel and nothing is retried. Every file goes up with `.md5`,
//! `.sha1`, `.sha256` and `.sha512` siblings, and the artifact's
//! `maven-metadata.xml` is merged and uploaded last.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::fs;
use tracing::{debug, info};

use crate::artifact_discovery::ArtifactSet;
use crate::channel::{Channel, ChannelPolicy};
use crate::error::{CredentialError, PublishError, VersionError};
use crate::metadata::MavenMetadata;
use crate::project::PublishingSection;

/// Repository login. Lives only for one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Reads both variables; either one missing or empty is an error.
    pub fn from_env(username_var: &str, password_var: &str) -> Result<Self, CredentialError> {
        Ok(Self::new(read_var(username_var)?, read_var(password_var)?))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn authorization_header(&self) -> String {
        let token = STANDARD.encode(format!("{}:{}", self.username, self.password));
        format!("Basic {token}")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn read_var(variable: &str) -> Result<String, CredentialError> {
    match std::env::var(variable) {
        Ok(value) if value.is_empty() => Err(CredentialError::Empty {
            variable: variable.to_string(),
        }),
        Ok(value) => Ok(value),
        Err(std::env::VarError::NotPresent) => Err(CredentialError::Missing {
            variable: variable.to_string(),
        }),
        Err(std::env::VarError::NotUnicode(_)) => Err(CredentialError::NotUnicode {
            variable: variable.to_string(),
        }),
    }
}

pub trait Transport {
    fn put(&self, url: &str, credentials: &Credentials, body: &[u8]) -> Result<(), PublishError>;

    /// `Ok(None)` when the repository has no such file yet.
    fn fetch(&self, url: &str, credentials: &Credentials) -> Result<Option<Vec<u8>>, PublishError>;
}

/// Authenticated uploads and downloads over `ureq`.
pub struct HttpTransport {
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn put(&self, url: &str, credentials: &Credentials, body: &[u8]) -> Result<(), PublishError> {
        let authorization = credentials.authorization_header();
        self.agent
            .put(url)
            .header("Authorization", authorization.as_str())
            .send(body)
            .map_err(|e| map_ureq_error(url, &e))?;
        Ok(())
    }

    fn fetch(&self, url: &str, credentials: &Credentials) -> Result<Option<Vec<u8>>, PublishError> {
        let authorization = credentials.authorization_header();
        let response = match self
            .agent
            .get(url)
            .header("Authorization", authorization.as_str())
            .call()
        {
            Ok(response) => response,
            Err(ureq::Error::StatusCode(404)) => return Ok(None),
            Err(e) => return Err(map_ureq_error(url, &e)),
        };

        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|e| map_ureq_error(url, &e))?;
        Ok(Some(body))
    }
}

fn map_ureq_error(url: &str, err: &ureq::Error) -> PublishError {
    match err {
        ureq::Error::StatusCode(status) => PublishError::Rejected {
            url: url.to_owned(),
            status: *status,
        },
        other => PublishError::Transport {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationTarget {
    pub channel: Channel,
    pub repository_name: String,
    pub url: String,
}

/// One file to upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub url: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct PublishPlan {
    pub target: PublicationTarget,
    pub uploads: Vec<Upload>,
    /// Written after `uploads`, once the existing listing has been merged.
    pub metadata_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub target: PublicationTarget,
    pub uploaded: Vec<String>,
}

pub struct Publisher {
    policy: ChannelPolicy,
    repository_name: String,
    snapshot_url: String,
    release_url: String,
}

impl Publisher {
    pub fn new(
        policy: ChannelPolicy,
        repository_name: impl Into<String>,
        snapshot_url: impl Into<String>,
        release_url: impl Into<String>,
    ) -> Self {
        Self {
            policy,
            repository_name: repository_name.into(),
            snapshot_url: snapshot_url.into(),
            release_url: release_url.into(),
        }
    }

    pub fn from_section(section: &PublishingSection) -> Self {
        Self::new(
            section.channel_policy(),
            &section.name,
            &section.snapshot_url,
            &section.release_url,
        )
    }

    pub fn target(&self, version: &str) -> Result<PublicationTarget, VersionError> {
        let channel = self.policy.select(version)?;
        let url = match channel {
            Channel::PreRelease => &self.snapshot_url,
            Channel::Stable => &self.release_url,
        };

        Ok(PublicationTarget {
            channel,
            repository_name: self.repository_name.clone(),
            url: url.clone(),
        })
    }

    /// Reads every file and lays out the uploads: POM first, then each
    /// jar, each followed by its checksums.
    pub fn plan(&self, set: &ArtifactSet) -> Result<PublishPlan, PublishError> {
        let target = self.target(&set.coordinate.version)?;
        let mut uploads = Vec::new();

        push_with_checksums(
            &mut uploads,
            set.coordinate.url_in(&target.url, &set.pom_file_name()),
            set.pom.as_bytes().to_vec(),
        );

        for artifact in &set.files {
            let body = fs::read(&artifact.path).map_err(|source| PublishError::Io {
                path: artifact.path.clone(),
                source,
            })?;
            push_with_checksums(
                &mut uploads,
                set.coordinate.url_in(&target.url, &artifact.file_name),
                body,
            );
        }

        let metadata_url = MavenMetadata::url_in(&set.coordinate, &target.url);
        Ok(PublishPlan {
            target,
            uploads,
            metadata_url,
        })
    }

    pub fn publish(
        &self,
        set: &ArtifactSet,
        credentials: &Credentials,
        transport: &dyn Transport,
    ) -> Result<PublishReport, PublishError> {
        let plan = self.plan(set)?;
        info!(
            channel = %plan.target.channel,
            repository = %plan.target.url,
            files = plan.uploads.len(),
            "publishing {}",
            set.coordinate
        );

        let mut uploaded = Vec::with_capacity(plan.uploads.len() + CHECKSUMS.len() + 1);
        put_all(&plan.uploads, credentials, transport, &mut uploaded)?;

        let mut metadata = match transport.fetch(&plan.metadata_url, credentials)? {
            Some(existing) => MavenMetadata::parse(&set.coordinate, &String::from_utf8_lossy(&existing)),
            None => MavenMetadata::new(&set.coordinate),
        };
        metadata.add_version(&set.coordinate.version, plan.target.channel);
        debug!(versions = metadata.versions().len(), "updating {}", plan.metadata_url);

        let last_updated = chrono::Utc::now().format("%Y%m%d%H%M%S").to_string();
        let mut metadata_uploads = Vec::new();
        push_with_checksums(
            &mut metadata_uploads,
            plan.metadata_url.clone(),
            metadata.render(&last_updated).into_bytes(),
        );
        put_all(&metadata_uploads, credentials, transport, &mut uploaded)?;

        Ok(PublishReport {
            target: plan.target,
            uploaded,
        })
    }
}

fn put_all(
    uploads: &[Upload],
    credentials: &Credentials,
    transport: &dyn Transport,
    uploaded: &mut Vec<String>,
) -> Result<(), PublishError> {
    for upload in uploads {
        debug!(url = %upload.url, bytes = upload.body.len(), "uploading");
        transport.put(&upload.url, credentials, &upload.body)?;
        uploaded.push(upload.url.clone());
    }
    Ok(())
}

/// Extensions of the checksum files written next to every upload.
pub const CHECKSUMS: [&str; 4] = ["md5", "sha1", "sha256", "sha512"];

fn push_with_checksums(uploads: &mut Vec<Upload>, url: String, body: Vec<u8>) {
    let checksums = [
        format!("{:x}", md5::compute(&body)),
        format!("{:x}", Sha1::digest(&body)),
        format!("{:x}", Sha256::digest(&body)),
        format!("{:x}", Sha512::digest(&body)),
    ];
    uploads.push(Upload {
        url: url.clone(),
        body,
    });
    for (extension, checksum) in CHECKSUMS.into_iter().zip(checksums) {
        uploads.push(Upload {
            url: format!("{url}.{extension}"),
            body: checksum.into_bytes(),
        });
    }
}
