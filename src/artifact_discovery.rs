use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

use crate::coordinate::Coordinate;

pub struct ArtifactDiscovery {
    output_dir: PathBuf,
    coordinate: Coordinate,
    sources: bool,
    javadoc: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Library,
    Sources,
    Javadoc,
}

impl ArtifactKind {
    pub fn classifier(&self) -> Option<&str> {
        match self {
            ArtifactKind::Library => None,
            ArtifactKind::Sources => Some("sources"),
            ArtifactKind::Javadoc => Some("javadoc"),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ArtifactKind::Library => "library",
            ArtifactKind::Sources => "sources",
            ArtifactKind::Javadoc => "javadoc",
        }
    }
}

/// Everything published under one version: the POM and the jars.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub coordinate: Coordinate,
    pub pom: String,
    pub files: Vec<DiscoveredArtifact>,
}

impl ArtifactSet {
    pub fn pom_file_name(&self) -> String {
        self.coordinate.file_name(None, "pom")
    }
}

impl ArtifactDiscovery {
    pub fn new(output_dir: impl AsRef<Path>, coordinate: Coordinate) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            coordinate,
            sources: false,
            javadoc: false,
        }
    }

    pub fn sources(mut self, enabled: bool) -> Self {
        self.sources = enabled;
        self
    }

    pub fn javadoc(mut self, enabled: bool) -> Self {
        self.javadoc = enabled;
        self
    }

    /// Finds the library jar and any enabled bundles. Every expected file
    /// must be present.
    pub fn discover_artifacts(&self) -> Result<Vec<DiscoveredArtifact>> {
        let mut kinds = vec![ArtifactKind::Library];
        if self.sources {
            kinds.push(ArtifactKind::Sources);
        }
        if self.javadoc {
            kinds.push(ArtifactKind::Javadoc);
        }

        kinds
            .into_iter()
            .map(|kind| self.find_artifact(kind))
            .collect()
    }

    fn find_artifact(&self, kind: ArtifactKind) -> Result<DiscoveredArtifact> {
        let file_name = self.coordinate.file_name(kind.classifier(), "jar");
        let path = self.output_dir.join(&file_name);

        if !path.is_file() {
            return Err(anyhow!(
                "Could not find {} artifact {} in {}",
                kind.as_str(),
                file_name,
                self.output_dir.display()
            ));
        }

        tracing::debug!(kind = kind.as_str(), path = %path.display(), "found artifact");

        Ok(DiscoveredArtifact {
            kind,
            file_name,
            path,
        })
    }
}
